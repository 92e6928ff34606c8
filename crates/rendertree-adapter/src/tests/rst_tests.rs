use super::*;
use rendertree_core::{Component, ComponentError, Engine, Leaf, Props, RenderMode, Renderable};

struct Foo;

impl Component for Foo {
    fn construct(_props: &Props) -> Result<Self, ComponentError> {
        Ok(Foo)
    }

    fn render(&self, _props: &Props) -> Result<Renderable, ComponentError> {
        Ok(rendertree_core::Element::host("div")
            .prop("className", "x")
            .child("hello")
            .child(4)
            .into())
    }
}

fn expected_foo() -> RstNode {
    RstNode::class::<Foo>().rendered(
        RstNode::host("div")
            .prop("className", "x")
            .rendered(vec![RstChild::from("hello"), RstChild::from(4)]),
    )
}

#[test]
fn display_prints_indented_json_like_tree() {
    let expected = "{
  \"nodeType\": \"class\",
  \"type\": Foo,
  \"props\": {},
  \"key\": null,
  \"ref\": null,
  \"instance\": null,
  \"rendered\": {
    \"nodeType\": \"host\",
    \"type\": \"div\",
    \"props\": {
      \"className\": \"x\"
    },
    \"key\": null,
    \"ref\": null,
    \"instance\": null,
    \"rendered\": [
      \"hello\",
      4
    ]
  }
}";
    assert_eq!(expected_foo().to_string(), expected);
}

#[test]
fn display_escapes_strings_and_marks_keys() {
    let node = RstNode::host("p")
        .key("k1")
        .rendered_one("say \"hi\"\n");
    let text = node.to_string();
    assert!(text.contains("\"key\": \"k1\""));
    assert!(text.contains("\"rendered\": \"say \\\"hi\\\"\\n\""));
}

#[test]
fn clean_drops_every_instance() {
    let tree = Engine::default()
        .render(&rendertree_core::Element::class::<Foo>(), RenderMode::Mount)
        .expect("render");
    let mut node = normalize(&tree, RenderMode::Mount)
        .expect("normalize")
        .expect("root");
    assert!(node.instance.as_ref().is_some_and(|handle| handle.is::<Foo>()));
    assert!(node.to_string().contains("\"instance\": <Foo instance>"));

    node.clean();
    assert_eq!(node.instance, None);
    let expected = RstNode::class::<Foo>().rendered(
        RstNode::host("div")
            .prop("className", "x")
            .rendered_many(["hello", "4"]),
    );
    assert_eq!(node, expected);
}

#[test]
fn cardinality_follows_child_count() {
    assert_eq!(Rendered::from_children(Vec::new()), Rendered::Null);
    assert_eq!(
        Rendered::from_children(vec![RstChild::from("a")]),
        Rendered::One(Box::new(RstChild::from("a")))
    );
    let many = Rendered::from_children(vec![RstChild::from("a"), RstChild::from("b")]);
    assert!(matches!(&many, Rendered::Many(items) if items.len() == 2));
    assert_eq!(many.len(), 2);
    assert!(Rendered::Null.is_empty());
}

#[test]
fn walk_visits_nodes_in_document_order() {
    let tree = RstNode::host("root").rendered_many([
        RstChild::from(RstNode::host("a").rendered_one(RstNode::host("a1"))),
        RstChild::from("text"),
        RstChild::from(RstNode::host("b")),
    ]);
    let names: Vec<&str> = tree.walk().map(RstNode::display_name).collect();
    assert_eq!(names, vec!["root", "a", "a1", "b"]);
    assert_eq!(
        tree.find(|node| node.display_name().starts_with('a'))
            .map(RstNode::display_name),
        Some("a")
    );
}

#[test]
fn leaves_are_collected_in_order() {
    let tree = RstNode::host("p").rendered_many([
        RstChild::from("one"),
        RstChild::from(RstNode::host("b").rendered_many([2])),
        RstChild::from(3.5),
    ]);
    assert_eq!(
        tree.leaves(),
        vec![&Leaf::from("one"), &Leaf::Int(2), &Leaf::Float(3.5)]
    );
}

#[test]
fn fingerprint_ignores_instances_but_not_leaf_types() {
    let tree = Engine::default()
        .render(&rendertree_core::Element::class::<Foo>(), RenderMode::Mount)
        .expect("render");
    let live = normalize(&tree, RenderMode::Mount)
        .expect("normalize")
        .expect("root");
    let cleaned = live.clone().cleaned();
    assert_eq!(live.fingerprint(), cleaned.fingerprint());

    let numeric = RstNode::host("b").rendered_many([4]);
    let text = RstNode::host("b").rendered_many(["4"]);
    assert_ne!(numeric.fingerprint(), text.fingerprint());
    assert_ne!(
        RstNode::host("b").fingerprint(),
        RstNode::host("b").key("k").fingerprint()
    );
}
