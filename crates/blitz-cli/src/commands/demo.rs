use std::path::PathBuf;

use anyhow::Result;
use blitz_core::{render_outline, DisplayType, Node, TreeStore};

use crate::commands::templates::resolve_all;
use crate::config::CliConfig;
use crate::page_file::write_page;

/// Sample page exercising every node kind, with references to both stock templates
pub fn demo_page() -> Node {
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
                    Node::selector(
                        "child5",
                        "years of experience:",
                        "years-of-exp",
                        Vec::<String>::new(),
                    ),
                    Node::reference("child3", "comp-address"),
                ],
            ),
        ],
    )
}

pub fn execute(config: CliConfig, output: Option<PathBuf>, resolve: bool) -> Result<()> {
    let mut store = TreeStore::new(demo_page())?;
    if resolve {
        resolve_all(&config, &mut store)?;
    }

    match output {
        Some(path) => {
            write_page(&path, store.tree())?;
            println!("Demo page written to {}", path.display());
        }
        None => print!("{}", render_outline(store.tree())),
    }
    Ok(())
}
