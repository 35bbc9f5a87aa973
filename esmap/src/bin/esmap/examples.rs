//! Usage examples shown after each subcommand's `--help`.

use std::fmt::Write;

use colored::Colorize;

use crate::theme::Tone;

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

pub fn render_examples(groups: &[ExampleGroup]) -> String {
    let mut text = format!("{}\n", "Examples:".cyan().bold());
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            text.push('\n');
        }
        let _ = writeln!(text, "  {}", Tone::Heading.paint(group.title));
        for command in group.commands {
            let _ = writeln!(text, "    {} {}", "→".magenta(), command.magenta());
        }
    }
    text
}
