//! End-to-end editing sessions: render, dispatch, resolve, persist.

use blitz_core::{
    render_rows, Action, Control, DispatchOutcome, DisplayType, InMemoryPageStore, Node, NodeKind,
    NodePath, PageStore, TemplateRegistry, TreeError, TreeStore,
};
use serde_json::json;

fn path(raw: &str) -> NodePath {
    NodePath::parse(raw).unwrap()
}

fn child_ids(store: &TreeStore, raw: &str) -> Vec<String> {
    store
        .lookup(&path(raw))
        .and_then(Node::children)
        .map(|c| c.iter().map(|n| n.id().to_string()).collect())
        .unwrap_or_default()
}

fn sample_page() -> Node {
    Node::page(
        "page0",
        "Page 1",
        [
            Node::title("child0", "Who are you"),
            Node::input("child1", "name:", "name", "text"),
            Node::reference("child2", "comp-fName"),
            Node::reference("child3", "comp-address"),
            Node::layout(
                "layout0",
                "Work and Education",
                DisplayType::Block,
                [
                    Node::selector("child4", "your university:", "university", Vec::<String>::new()),
                    Node::reference("child3", "comp-address"),
                ],
            ),
        ],
    )
}

#[test]
fn reorder_and_reparent() {
    let mut store = TreeStore::new(Node::page(
        "p",
        "",
        [
            Node::layout("l", "", DisplayType::Block, [Node::title("x", "X")]),
            Node::title("y", "Y"),
        ],
    ))
    .unwrap();

    store.dispatch(&Action::MoveRight { path: path("p_y") }).unwrap();
    assert_eq!(child_ids(&store, "p"), ["l"]);
    assert_eq!(child_ids(&store, "p_l"), ["x", "y"]);

    store.dispatch(&Action::MoveLeft { path: path("p_l_x") }).unwrap();
    assert_eq!(child_ids(&store, "p"), ["l", "x"]);
    assert_eq!(child_ids(&store, "p_l"), ["y"]);

    store.dispatch(&Action::MoveUp { path: path("p_x") }).unwrap();
    assert_eq!(child_ids(&store, "p"), ["x", "l"]);
    assert_eq!(store.revision(), 3);
}

#[test]
fn edit_through_rendered_controls() {
    let mut store = TreeStore::new(sample_page()).unwrap();

    let rows = render_rows(store.tree());
    let layout = rows
        .iter()
        .find(|r| r.path == path("page0_layout0"))
        .unwrap();
    assert!(layout.offers(Control::AddChild));

    store
        .dispatch(&Control::AddChild.action(layout.path.clone()))
        .unwrap();
    assert_eq!(child_ids(&store, "page0_layout0"), ["child4", "child3", "child5"]);

    store
        .dispatch(&Control::DeleteChildren.action(layout.path.clone()))
        .unwrap();
    assert!(child_ids(&store, "page0_layout0").is_empty());

    let rows = render_rows(store.tree());
    let layout = rows
        .iter()
        .find(|r| r.path == path("page0_layout0"))
        .unwrap();
    assert!(!layout.offers(Control::AddChild));
}

#[test]
fn same_sibling_id_under_different_parents() {
    let mut store = TreeStore::new(sample_page()).unwrap();

    store
        .dispatch(&Action::Delete {
            path: path("page0_layout0_child3"),
        })
        .unwrap();

    assert!(store.lookup(&path("page0_child3")).is_some());
    assert!(store.lookup(&path("page0_layout0_child3")).is_none());
}

#[test]
fn resolve_then_edit_templates() {
    let mut store = TreeStore::new(sample_page()).unwrap();
    let report = store.resolve_references(&TemplateRegistry::builtin());

    assert!(report.is_complete());
    assert_eq!(report.resolved.len(), 3);
    assert_eq!(
        store.lookup(&path("page0_child2")).unwrap().kind(),
        NodeKind::Input
    );
    assert_eq!(
        child_ids(&store, "page0_child3"),
        ["child0", "child1", "child2", "child3"]
    );

    store
        .dispatch(&Action::MoveDown {
            path: path("page0_layout0_child3_child0"),
        })
        .unwrap();
    assert_eq!(
        child_ids(&store, "page0_layout0_child3"),
        ["child1", "child0", "child2", "child3"]
    );
    assert_eq!(
        child_ids(&store, "page0_child3"),
        ["child0", "child1", "child2", "child3"]
    );
}

#[test]
fn wire_actions_from_front_end() {
    let mut store = TreeStore::new(sample_page()).unwrap();

    let outcome = store.dispatch_json(json!({
        "type": "COPY_REF_ELEMENT",
        "id": "page0_child2",
        "elementConfig": {
            "id": "comp-fName",
            "type": "input",
            "label": "your family name:",
            "variable": "fName",
            "inputType": "text"
        }
    }));
    assert_eq!(outcome, DispatchOutcome::Committed { revision: 1 });
    assert_eq!(
        store.lookup(&path("page0_child2")).unwrap().label(),
        "your family name:"
    );

    assert_eq!(
        store.dispatch_json(json!({ "type": "ADD_CHILDREN", "id": "page0_child0" })),
        DispatchOutcome::Unchanged
    );
}

#[test]
fn root_is_never_a_target() {
    let mut store = TreeStore::new(sample_page()).unwrap();
    for control in Control::MOVES.into_iter().chain(Control::CONTAINER) {
        let result = store.dispatch(&control.action(path("page0")));
        assert!(
            matches!(result, Err(TreeError::InvalidMove { .. })),
            "{} on the root should be rejected",
            control
        );
    }
    assert_eq!(store.revision(), 0);
}

#[tokio::test]
async fn persist_edited_page() {
    let mut store = TreeStore::new(sample_page()).unwrap();
    store.resolve_references(&TemplateRegistry::builtin());

    let pages = InMemoryPageStore::new();
    let record = pages.insert_page(store.tree()).await.unwrap();

    let loaded = pages.get_page(record.uid).await.unwrap().unwrap();
    assert_eq!(&loaded.page, store.tree());

    let reopened = TreeStore::new(loaded.page).unwrap();
    assert_eq!(reopened.index().len(), store.index().len());
}
