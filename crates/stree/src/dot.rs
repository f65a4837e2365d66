//! Graphviz rendering for diagnostics.

use crate::{Alphabet, SuffixTree};
use std::fmt::{self, Display, Write};

impl<A: Alphabet> SuffixTree<A>
where
    A::Symbol: Display,
{
    /// Writes the tree as a Graphviz `strict digraph`.
    ///
    /// Every tree edge is drawn as a chain of one-symbol sub-edges through
    /// point-shaped joints, so the rendered labels read as the concatenated
    /// edge substring. Leaves show their suffix start, suffix links are
    /// dashed red, and two note nodes mark the engine's tracked extension
    /// end and the internal node created by the current extension.
    pub fn dot<W: Write>(&self, writer: &mut W) -> fmt::Result {
        writeln!(writer, "strict digraph {{")?;
        writeln!(writer, "  n0 [label=\"root\", style=bold];")?;
        for (index, record) in self.nodes().skip(1) {
            let id = index.index();
            if let Some(start) = record.string_start() {
                writeln!(writer, "  n{id} [label=\"{start}\", shape=box];")?;
            } else {
                writeln!(writer, "  n{id} [label=\"\", shape=circle];")?;
            }
            let parent = record.parent().expect("non-root node has a parent");
            let label = self.edge_label(index);
            let mut from = format!("n{}", parent.index());
            for (position, symbol) in label.iter().enumerate() {
                let to = if position + 1 == label.len() {
                    format!("n{id}")
                } else {
                    let joint = format!("n{id}j{position}");
                    writeln!(writer, "  {joint} [shape=point];")?;
                    joint
                };
                writeln!(writer, "  {from} -> {to} [label=\"{symbol}\"];")?;
                from = to;
            }
            if let Some(link) = record.suffix_link() {
                writeln!(
                    writer,
                    "  n{id} -> n{} [style=dashed, color=red, constraint=false];",
                    link.index()
                )?;
            }
        }
        let (last_end, offset) = self.last_end();
        writeln!(writer, "  last_end [shape=note, label=\"last end +{offset}\"];")?;
        writeln!(writer, "  last_end -> n{} [style=dotted];", last_end.index())?;
        if let Some(created) = self.new_internal() {
            writeln!(writer, "  new_internal [shape=note, label=\"new internal\"];")?;
            writeln!(writer, "  new_internal -> n{} [style=dotted];", created.index())?;
        }
        writeln!(writer, "}}")
    }

    /// Renders [`dot`](Self::dot) into a fresh `String`.
    pub fn dot_string(&self) -> String {
        let mut rendered = String::new();
        self.dot(&mut rendered)
            .expect("formatting into a String cannot fail");
        rendered
    }
}
