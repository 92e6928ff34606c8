use super::*;
use crate::assertions::{assert_instance_of, assert_leaves, assert_rendered_len, assert_tree_eq};
use rendertree_adapter::Rendered;
use rendertree_core::{Component, ComponentError, Leaf, Props, Renderable};
use std::cell::Cell;

thread_local! {
    static RENDERS: Cell<usize> = Cell::new(0);
}

struct Greeting;

impl Component for Greeting {
    fn construct(_props: &Props) -> Result<Self, ComponentError> {
        Ok(Greeting)
    }

    fn render(&self, props: &Props) -> Result<Renderable, ComponentError> {
        RENDERS.with(|count| count.set(count.get() + 1));
        let name = props.get_str("name").unwrap_or("world");
        Ok(Element::host("h1").child(format!("hello {name}")).into())
    }
}

#[test]
fn rule_without_content_has_no_node() {
    run_test_render(|rule| {
        assert!(!rule.has_content());
        assert_eq!(rule.mode(), RenderMode::Mount);
        assert!(matches!(
            rule.node(),
            Err(TreeError::InvalidInstanceState { .. })
        ));
        assert!(rule.rerender().is_ok());
    });
}

#[test]
fn set_content_renders_and_rerender_starts_over() {
    RENDERS.with(|count| count.set(0));
    let mut rule = RenderTestRule::default();
    rule.set_content(Element::class::<Greeting>().prop("name", "rule"))
        .expect("render");
    assert!(rule.has_content());
    assert_eq!(
        rule.dump_tree(),
        "[0] class Greeting\n  [1] host h1\n    [2] text Text(\"hello rule\")\n"
    );

    let before = rule.node().expect("node").expect("root");
    rule.rerender().expect("rerender");
    assert_eq!(RENDERS.with(Cell::get), 2);
    assert!(before.instance.as_ref().is_some_and(|i| !i.is_alive()));

    let cleaned = rule.cleaned_node().expect("node").expect("root");
    assert_eq!(cleaned.instance, None);
    assert_eq!(cleaned, before.cleaned());
}

#[test]
fn shallow_rule_defers_the_output() {
    let mut rule = RenderTestRule::shallow();
    rule.set_content(Element::class::<Greeting>()).expect("render");
    assert_eq!(rule.dump_tree(), "[0] class Greeting (deferred)\n");
    let node = rule.node().expect("node").expect("root");
    let heading = node.rendered.as_node().expect("h1");
    assert_eq!(heading.rendered, Rendered::One(Box::new("hello world".into())));
}

#[test]
fn assertion_helpers_accept_matching_trees() {
    let mut rule = RenderTestRule::mount();
    rule.set_content(Element::class::<Greeting>()).expect("render");
    let node = rule.node().expect("node").expect("root");

    assert_instance_of::<Greeting>(&node, "root");
    assert_rendered_len(&node, 1, "root");
    assert_leaves(&node, &[Leaf::from("hello world")], "leaves");
    assert_tree_eq(
        &node,
        &RstNode::class::<Greeting>().rendered(RstNode::host("h1").rendered_many(["hello world"])),
        "tree",
    );
}

#[test]
#[should_panic(expected = "greeting: trees differ")]
fn assert_tree_eq_reports_differences() {
    let mut rule = RenderTestRule::mount();
    rule.set_content(Element::class::<Greeting>()).expect("render");
    let node = rule.node().expect("node").expect("root");
    assert_tree_eq(&node, &RstNode::class::<Greeting>(), "greeting");
}

#[test]
#[should_panic(expected = "after unmount: expected a live Greeting instance")]
fn assert_instance_of_rejects_dead_instances() {
    let mut rule = RenderTestRule::mount();
    rule.set_content(Element::class::<Greeting>()).expect("render");
    let node = rule.node().expect("node").expect("root");
    rule.unmount().expect("unmount");
    assert_instance_of::<Greeting>(&node, "after unmount");
}
