//! Terminal prompts for interactive runs.
//!
//! Prompts are written to stderr so that `--stdout` output stays clean.

use anyhow::{bail, Result};
use console::{style, Term};
use std::io::BufRead;

use crate::domain::{CompressionMode, SelectionMode};
use crate::select::{FileTree, ManualChoice, TreeEntry, SELECT_ALL_TOKEN};

const MODE_MENU: &[&str] =
    &["Full codebase", "Prompt-based (AI-assisted)", "Manual file selection", "Exit"];

const COMPRESSION_MENU: &[(&str, CompressionMode)] = &[
    ("No compression", CompressionMode::None),
    ("Basic (comments, minify, whitespace)", CompressionMode::Basic),
    ("Advanced (regex chain)", CompressionMode::Advanced),
    ("Both (basic, then advanced)", CompressionMode::Both),
];

/// Read one answer line from stdin. Closed input ends the session instead
/// of re-prompting forever.
fn read_answer(term: &Term) -> Result<String> {
    term.flush()?;
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line)? == 0 {
        bail!("input closed before a choice was made");
    }
    Ok(line)
}

fn print_menu(term: &Term, title: &str, items: &[&str]) -> Result<()> {
    term.write_line(&format!("{}", style(title).bold()))?;
    for (i, item) in items.iter().enumerate() {
        term.write_line(&format!("  {} {item}", style(format!("{})", i + 1)).cyan()))?;
    }
    Ok(())
}

/// 1-based menu answer to a 0-based index.
fn parse_menu_answer(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

fn ask_menu(term: &Term, title: &str, items: &[&str], default: usize) -> Result<usize> {
    print_menu(term, title, items)?;
    loop {
        term.write_str(&format!("Choice [{}]: ", default + 1))?;
        let answer = read_answer(term)?;
        if answer.trim().is_empty() {
            return Ok(default);
        }
        match parse_menu_answer(&answer, items.len()) {
            Some(idx) => return Ok(idx),
            None => term.write_line(&format!(
                "{}",
                style(format!("Enter a number between 1 and {}", items.len())).red()
            ))?,
        }
    }
}

/// `None` means the user chose Exit.
pub fn choose_mode(term: &Term) -> Result<Option<SelectionMode>> {
    let idx = ask_menu(term, "Choose selection mode:", MODE_MENU, 0)?;
    Ok(match idx {
        0 => Some(SelectionMode::Full),
        1 => Some(SelectionMode::Query),
        2 => Some(SelectionMode::Manual),
        _ => None,
    })
}

pub fn ask_goal(term: &Term) -> Result<String> {
    loop {
        term.write_str("What do you want to do? ")?;
        let goal = read_answer(term)?;
        let goal = goal.trim();
        if !goal.is_empty() {
            return Ok(goal.to_string());
        }
        term.write_line(&format!("{}", style("Describe the task in a few words").red()))?;
    }
}

pub fn choose_compression(term: &Term, default: CompressionMode) -> Result<CompressionMode> {
    let labels: Vec<&str> = COMPRESSION_MENU.iter().map(|(label, _)| *label).collect();
    let default_idx = COMPRESSION_MENU.iter().position(|(_, mode)| *mode == default).unwrap_or(0);
    let idx = ask_menu(term, "Compression:", &labels, default_idx)?;
    Ok(COMPRESSION_MENU[idx].1)
}

/// Show the tree and read one line of picks.
pub fn pick_entries(term: &Term, tree: &FileTree) -> Result<Vec<ManualChoice>> {
    let entries = tree.entries();
    term.write_line(&format!("{}", style("Select files and folders:").bold()))?;
    for (i, entry) in entries.iter().enumerate() {
        let label = entry.label();
        let label = if entry.is_folder { style(label).blue() } else { style(label) };
        term.write_line(&format!("{:>4}  {label}", i + 1))?;
    }
    term.write_line(&format!(
        "{}",
        style(format!(
            "Numbers, ranges (2-5) or paths, separated by spaces or commas; {SELECT_ALL_TOKEN} for everything"
        ))
        .dim()
    ))?;

    loop {
        term.write_str("> ")?;
        let input = read_answer(term)?;
        match parse_picks(&input, &entries, tree) {
            Ok(choices) => return Ok(choices),
            Err(message) => term.write_line(&format!("{}", style(message).red()))?,
        }
    }
}

/// Parse a picker answer. Tokens are `*`, 1-based entry numbers, ranges
/// `a-b`, or paths known to the tree.
pub fn parse_picks(
    input: &str,
    entries: &[TreeEntry],
    tree: &FileTree,
) -> Result<Vec<ManualChoice>, String> {
    let mut choices = Vec::new();
    for token in input.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
        if let Some((start, end)) = parse_number_or_range(token) {
            let out_of_range = if start == 0 {
                Some(0)
            } else {
                (end > entries.len()).then_some(end)
            };
            if let Some(n) = out_of_range {
                return Err(format!("no entry numbered {n}"));
            }
            choices.extend(entries[start - 1..end].iter().map(entry_choice));
            continue;
        }
        let choice = ManualChoice::resolve(token, tree)
            .ok_or_else(|| format!("`{token}` is not in the file tree"))?;
        choices.push(choice);
    }
    Ok(choices)
}

/// `n` or `a-b` as inclusive 1-based bounds.
fn parse_number_or_range(token: &str) -> Option<(usize, usize)> {
    if let Ok(n) = token.parse::<usize>() {
        return Some((n, n));
    }
    let (start, end) = token.split_once('-')?;
    let start: usize = start.parse().ok()?;
    let end: usize = end.parse().ok()?;
    if start > end {
        return None;
    }
    Some((start, end))
}

fn entry_choice(entry: &TreeEntry) -> ManualChoice {
    if entry.is_folder {
        ManualChoice::Folder(entry.path.clone())
    } else {
        ManualChoice::File(entry.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> FileTree {
        FileTree::build(&["README.md", "src/a.js", "src/lib/b.js"])
    }

    #[test]
    fn menu_answers_are_one_based() {
        assert_eq!(parse_menu_answer("1", 4), Some(0));
        assert_eq!(parse_menu_answer(" 4 \n", 4), Some(3));
        assert_eq!(parse_menu_answer("0", 4), None);
        assert_eq!(parse_menu_answer("5", 4), None);
        assert_eq!(parse_menu_answer("two", 4), None);
    }

    #[test]
    fn picks_accept_numbers_ranges_paths_and_all() {
        let tree = tree();
        let entries = tree.entries();
        let folder = entries.iter().position(|e| e.path == "src").expect("src entry") + 1;
        let readme = entries.iter().position(|e| e.path == "README.md").expect("readme") + 1;

        let picks = parse_picks(&format!("{folder}, {readme}"), &entries, &tree).expect("picks");
        assert_eq!(
            picks,
            vec![ManualChoice::Folder("src".into()), ManualChoice::File("README.md".into())]
        );

        let picks = parse_picks("src/lib/ *", &entries, &tree).expect("picks");
        assert_eq!(picks, vec![ManualChoice::Folder("src/lib".into()), ManualChoice::All]);

        let all = parse_picks(&format!("1-{}", entries.len()), &entries, &tree).expect("range");
        assert_eq!(all.len(), entries.len());
    }

    #[test]
    fn unknown_picks_are_reported() {
        let tree = tree();
        let entries = tree.entries();
        assert!(parse_picks("99", &entries, &tree).is_err());
        assert!(parse_picks("docs/", &entries, &tree).is_err());
        assert_eq!(parse_picks("  ", &entries, &tree), Ok(Vec::new()));
    }

    #[test]
    fn ranges_past_the_last_entry_are_rejected_before_expanding() {
        let tree = tree();
        let entries = tree.entries();
        assert_eq!(
            parse_picks("1-18446744073709551615", &entries, &tree),
            Err("no entry numbered 18446744073709551615".to_string())
        );
        assert!(parse_picks("1-999999999", &entries, &tree).is_err());
        assert_eq!(parse_picks("0-2", &entries, &tree), Err("no entry numbered 0".to_string()));
        assert!(parse_picks("3-1", &entries, &tree).is_err());
    }
}
