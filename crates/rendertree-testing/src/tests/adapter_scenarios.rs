use crate::prelude::*;

fn mount_rule(options: AdapterOptions, element: Element) -> RenderTestRule {
    let mut rule = RenderTestRule::with_options(options, RenderMode::Mount);
    rule.set_content(element).expect("render");
    rule
}

fn root(rule: &RenderTestRule) -> RstNode {
    rule.node().expect("node").expect("root node")
}

mod mixed {
    use crate::prelude::*;

    pub struct Foo;

    impl Component for Foo {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Foo)
        }

        fn render(&self, _props: &Props) -> Result<Renderable, ComponentError> {
            Ok(Element::host("div")
                .child("hello")
                .child(4)
                .child("world")
                .into())
        }
    }
}

#[test]
fn mixed_children_are_stringified_by_modern_engines() {
    let rule = mount_rule(AdapterOptions::modern(), Element::class::<mixed::Foo>());
    let expected = RstNode::class::<mixed::Foo>()
        .rendered(RstNode::host("div").rendered_many(["hello", "4", "world"]));
    assert_tree_eq(&root(&rule), &expected, "mixed children");
}

#[test]
fn mixed_children_keep_numbers_on_legacy_engines() {
    let rule = mount_rule(AdapterOptions::legacy(), Element::class::<mixed::Foo>());
    let expected = RstNode::class::<mixed::Foo>().rendered(RstNode::host("div").rendered_many([
        RstChild::from("hello"),
        RstChild::from(4),
        RstChild::from("world"),
    ]));
    assert_tree_eq(&root(&rule), &expected, "mixed children");
}

mod null_render {
    use crate::prelude::*;

    pub struct Foo;

    impl Component for Foo {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Foo)
        }

        fn render(&self, _props: &Props) -> Result<Renderable, ComponentError> {
            Ok(Renderable::Empty)
        }
    }
}

#[test]
fn null_renders_have_no_rendered_output() {
    let rule = mount_rule(AdapterOptions::default(), Element::class::<null_render::Foo>());
    let node = root(&rule);
    assert_instance_of::<null_render::Foo>(&node, "null render");
    assert_eq!(node.rendered, Rendered::Null);
    assert_eq!(node.cleaned(), RstNode::class::<null_render::Foo>());
}

fn qoo_span() -> RstNode {
    RstNode::host("span")
        .prop("className", "Qoo")
        .rendered_many(["Hello World!"])
}

mod function_qoo {
    use crate::prelude::*;

    pub struct Qoo;

    impl FunctionComponent for Qoo {
        fn render(_props: &Props) -> Result<Renderable, ComponentError> {
            Ok(Element::host("span")
                .prop("className", "Qoo")
                .child("Hello World!")
                .into())
        }
    }
}

mod class_qoo {
    use crate::prelude::*;

    pub struct Qoo;

    impl Component for Qoo {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Qoo)
        }

        fn render(&self, _props: &Props) -> Result<Renderable, ComponentError> {
            Ok(Element::host("span")
                .prop("className", "Qoo")
                .child("Hello World!")
                .into())
        }
    }
}

#[test]
fn function_components_returning_hosts() {
    let rule = mount_rule(AdapterOptions::default(), Element::function::<function_qoo::Qoo>());
    let node = root(&rule);
    assert_eq!(node.instance, None);
    assert_tree_eq(
        &node,
        &RstNode::function::<function_qoo::Qoo>().rendered(qoo_span()),
        "function Qoo",
    );
}

#[test]
fn class_components_returning_hosts() {
    let rule = mount_rule(AdapterOptions::default(), Element::class::<class_qoo::Qoo>());
    let node = root(&rule);
    assert_instance_of::<class_qoo::Qoo>(&node, "class Qoo");
    assert_tree_eq(
        &node,
        &RstNode::class::<class_qoo::Qoo>().rendered(qoo_span()),
        "class Qoo",
    );
}

fn foo_div(class_name: &str, props: &Props) -> Element {
    Element::host("div")
        .prop("className", format!("Foo {class_name}"))
        .child(
            Element::host("span")
                .prop("className", "Foo2")
                .child("Literal"),
        )
        .child(props.children())
}

fn bar_output(props: &Props, foo: Element) -> Renderable {
    let class_name = if props.flag("special") { "special" } else { "normal" };
    foo.prop("className", class_name)
        .with_children(props.children().clone())
        .into()
}

mod function_tree {
    use crate::prelude::*;

    pub struct Qoo;

    impl FunctionComponent for Qoo {
        fn render(_props: &Props) -> Result<Renderable, ComponentError> {
            Ok(Element::host("span")
                .prop("className", "Qoo")
                .child("Hello World!")
                .into())
        }
    }

    pub struct Foo;

    impl FunctionComponent for Foo {
        fn render(props: &Props) -> Result<Renderable, ComponentError> {
            let class_name = props.get_str("className").unwrap_or_default();
            Ok(super::foo_div(class_name, props).into())
        }
    }

    pub struct Bar;

    impl Component for Bar {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Bar)
        }

        fn render(&self, props: &Props) -> Result<Renderable, ComponentError> {
            Ok(super::bar_output(props, Element::function::<Foo>()))
        }
    }

    pub struct Bam;

    impl Component for Bam {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Bam)
        }

        fn render(&self, _props: &Props) -> Result<Renderable, ComponentError> {
            Ok(Element::class::<Bar>()
                .prop("special", true)
                .child(Element::function::<Qoo>())
                .into())
        }
    }
}

#[test]
fn complicated_trees_with_function_components() {
    use function_tree::{Bam, Bar, Foo, Qoo};

    let rule = mount_rule(AdapterOptions::default(), Element::class::<Bam>());
    let tree = root(&rule);
    assert_instance_of::<Bam>(&tree, "root");
    assert_instance_of::<Bar>(tree.rendered.as_node().expect("Bar node"), "Bar");

    let expected = RstNode::class::<Bam>().rendered(
        RstNode::class::<Bar>().prop("special", true).rendered(
            RstNode::function::<Foo>().prop("className", "special").rendered(
                RstNode::host("div")
                    .prop("className", "Foo special")
                    .rendered_many([
                        RstNode::host("span")
                            .prop("className", "Foo2")
                            .rendered_many(["Literal"]),
                        RstNode::function::<Qoo>().rendered(qoo_span()),
                    ]),
            ),
        ),
    );
    assert_tree_eq(&tree, &expected, "function tree");
}

mod class_tree {
    use crate::prelude::*;

    pub struct Qoo;

    impl Component for Qoo {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Qoo)
        }

        fn render(&self, _props: &Props) -> Result<Renderable, ComponentError> {
            Ok(Element::host("span")
                .prop("className", "Qoo")
                .child("Hello World!")
                .into())
        }
    }

    pub struct Foo;

    impl Component for Foo {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Foo)
        }

        fn render(&self, props: &Props) -> Result<Renderable, ComponentError> {
            let class_name = props.get_str("className").unwrap_or_default();
            Ok(super::foo_div(class_name, props).into())
        }
    }

    pub struct Bar;

    impl Component for Bar {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Bar)
        }

        fn render(&self, props: &Props) -> Result<Renderable, ComponentError> {
            Ok(super::bar_output(props, Element::class::<Foo>()))
        }
    }

    pub struct Bam;

    impl Component for Bam {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Bam)
        }

        fn render(&self, _props: &Props) -> Result<Renderable, ComponentError> {
            Ok(Element::class::<Bar>()
                .prop("special", true)
                .child(Element::class::<Qoo>())
                .into())
        }
    }
}

#[test]
fn complicated_trees_with_class_components() {
    use class_tree::{Bam, Bar, Foo, Qoo};

    let rule = mount_rule(AdapterOptions::default(), Element::class::<Bam>());
    let tree = root(&rule);
    assert_instance_of::<Bam>(&tree, "root");
    assert_instance_of::<Bar>(tree.rendered.as_node().expect("Bar node"), "Bar");

    let expected = RstNode::class::<Bam>().rendered(
        RstNode::class::<Bar>().prop("special", true).rendered(
            RstNode::class::<Foo>().prop("className", "special").rendered(
                RstNode::host("div")
                    .prop("className", "Foo special")
                    .rendered_many([
                        RstNode::host("span")
                            .prop("className", "Foo2")
                            .rendered_many(["Literal"]),
                        RstNode::class::<Qoo>().rendered(qoo_span()),
                    ]),
            ),
        ),
    );
    assert_tree_eq(&tree, &expected, "class tree");

    let hosts = tree
        .walk()
        .filter(|node| node.node_type == NodeType::Host)
        .count();
    assert_eq!(hosts, 3);
    assert!(tree.walk().all(|node| !node.props.contains("children")));
}

mod shallow_tree {
    use crate::prelude::*;

    pub struct Bar;

    impl Component for Bar {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Err(ComponentError::new("Bar constructor should not be called"))
        }

        fn render(&self, _props: &Props) -> Result<Renderable, ComponentError> {
            Err(ComponentError::new("Bar render method should not be called"))
        }
    }

    pub struct Foo;

    impl Component for Foo {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Foo)
        }

        fn render(&self, _props: &Props) -> Result<Renderable, ComponentError> {
            Err(ComponentError::new("Foo render method should not be called"))
        }
    }

    pub struct Bam;

    impl Component for Bam {
        fn construct(_props: &Props) -> Result<Self, ComponentError> {
            Ok(Bam)
        }

        fn render(&self, _props: &Props) -> Result<Renderable, ComponentError> {
            Ok(Element::class::<Bar>()
                .child(Element::class::<Foo>())
                .child(Element::class::<Foo>())
                .child(Element::class::<Foo>())
                .into())
        }
    }
}

#[test]
fn basic_shallow_render_leaves_nested_components_alone() {
    use shallow_tree::{Bam, Bar, Foo};

    let mut rule = RenderTestRule::shallow();
    rule.set_content(Element::class::<Bam>())
        .expect("shallow render never touches Bar or Foo");
    let tree = root(&rule);
    assert_instance_of::<Bam>(&tree, "root");

    let expected = RstNode::class::<Bam>().rendered(RstNode::class::<Bar>().rendered_many([
        RstNode::class::<Foo>(),
        RstNode::class::<Foo>(),
        RstNode::class::<Foo>(),
    ]));
    assert_tree_eq(&tree, &expected, "shallow tree");
    assert!(tree.walk().skip(1).all(|node| node.instance.is_none()));
}

#[test]
fn mounting_the_shallow_tree_reaches_the_throwing_constructor() {
    let mut rule = RenderTestRule::mount();
    let err = rule
        .set_content(Element::class::<shallow_tree::Bam>())
        .expect_err("Bar cannot be constructed");
    assert_eq!(
        err.to_string(),
        "Bar failed during construction: Bar constructor should not be called"
    );
    assert!(rule.node().is_err());
}

#[test]
fn normalization_is_idempotent() {
    let rule = mount_rule(AdapterOptions::default(), Element::class::<class_tree::Bam>());
    let first = root(&rule);
    let second = root(&rule);
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.cleaned().fingerprint(), second.fingerprint());
}

#[test]
fn keys_and_refs_pass_through_in_order() {
    let handle = RefHandle::new();
    let list = Element::host("ul").children(
        ["b", "a", "c"]
            .into_iter()
            .map(|key| Element::host("li").key(key).child(key)),
    );
    let rule = mount_rule(
        AdapterOptions::default(),
        Element::function::<function_tree::Foo>()
            .prop("className", "list")
            .with_ref(&handle)
            .child(list),
    );
    let tree = root(&rule);
    assert_eq!(tree.ref_handle, Some(handle.clone()));
    // refs on function components never attach
    assert!(!handle.is_attached());

    let keys: Vec<&str> = tree
        .walk()
        .filter_map(|node| node.key.as_ref().map(Key::as_str))
        .collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
    assert_leaves(
        &tree,
        &[
            Leaf::from("Literal"),
            Leaf::from("b"),
            Leaf::from("a"),
            Leaf::from("c"),
        ],
        "list leaves",
    );
}

#[test]
fn unmount_kills_instances_and_invalidates_nodes() {
    let mut rule = mount_rule(AdapterOptions::default(), Element::class::<class_tree::Bam>());
    let tree = root(&rule);
    let instances: Vec<_> = tree.walk().filter_map(|node| node.instance.clone()).collect();
    assert_eq!(instances.len(), 4);
    assert!(instances.iter().all(|instance| instance.is_alive()));

    rule.unmount().expect("unmount");
    assert!(instances.iter().all(|instance| !instance.is_alive()));
    assert!(matches!(
        rule.node(),
        Err(TreeError::InvalidInstanceState { .. })
    ));
}

#[test]
fn rendered_lengths_follow_cardinality() {
    let rule = mount_rule(AdapterOptions::default(), Element::class::<class_tree::Bam>());
    let tree = root(&rule);
    assert_rendered_len(&tree, 1, "Bam renders Bar");
    let div = tree
        .find(|node| node.display_name() == "div")
        .expect("div");
    assert_rendered_len(div, 2, "div children");
}
