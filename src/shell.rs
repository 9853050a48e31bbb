//! Interactive command loop.
//!
//! The shell is generic over its input and output so the whole conversation
//! can be driven from memory in tests.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use rand::Rng;
use tracing::warn;

use crate::browser::FileBrowser;
use crate::config::Verbosity;
use crate::import::import_reader;
use crate::tokenize::{first_word, validate_key};
use crate::tree::Deletion;
use crate::{Error, Result, WordTree};

const LINE_SEP: &str = "-----------------------";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuCommand {
    Insert,
    Search,
    Delete,
    View,
    VerboseView,
    Import,
    Exit,
}

impl MenuCommand {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "insert" => Some(Self::Insert),
            "2" | "search" => Some(Self::Search),
            "3" | "delete" => Some(Self::Delete),
            "4" | "view" => Some(Self::View),
            "5" | "verbose" => Some(Self::VerboseView),
            "6" | "import" => Some(Self::Import),
            "7" | "exit" | "quit" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BrowseCommand {
    List,
    ChangeDir,
    Select,
    Exit,
}

impl BrowseCommand {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "ls" => Some(Self::List),
            "2" | "cd" => Some(Self::ChangeDir),
            "3" | "select" => Some(Self::Select),
            "4" | "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Input is exhausted.
    Quit,
}

enum Browse {
    Selected(BufReader<File>, String),
    Cancelled,
    Eof,
}

pub struct Shell<'t, G, R, W> {
    tree: &'t mut WordTree<G>,
    input: R,
    out: W,
    browser: FileBrowser,
    verbosity: Verbosity,
    line: Vec<u8>,
}

impl<'t, G: Rng, R: BufRead, W: Write> Shell<'t, G, R, W> {
    pub fn new(tree: &'t mut WordTree<G>, input: R, out: W, browser: FileBrowser) -> Self {
        Self {
            tree,
            input,
            out,
            browser,
            verbosity: Verbosity::Simple,
            line: Vec::new(),
        }
    }

    /// With [`Verbosity::Verbose`], search results also show node addresses.
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Run until the exit command or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{LINE_SEP}")?;
        self.instructions()?;
        writeln!(self.out, "{LINE_SEP}")?;

        loop {
            self.prompt("Enter a command: ")?;
            let Some(line) = self.read_line()? else {
                writeln!(self.out)?;
                break;
            };
            writeln!(self.out, "{LINE_SEP}")?;

            let flow = match MenuCommand::parse(&line) {
                Some(MenuCommand::Exit) => Flow::Quit,
                Some(command) => self.dispatch(command)?,
                None => {
                    writeln!(self.out, "Invalid command!")?;
                    self.instructions()?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
            writeln!(self.out, "{LINE_SEP}")?;
        }

        writeln!(self.out, "Exiting...")?;
        writeln!(self.out, "{LINE_SEP}")?;
        self.out.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, command: MenuCommand) -> Result<Flow> {
        match command {
            MenuCommand::Insert => {
                let Some(word) = self.read_word("Enter a word to insert into the AVL tree: ")?
                else {
                    return Ok(Flow::Quit);
                };
                let count = self.tree.insert_owned(word.clone())?;
                writeln!(
                    self.out,
                    "'{}' now has {} instance{}.",
                    word,
                    count,
                    plural(count)
                )?;
            }
            MenuCommand::Search => {
                let Some(word) = self.read_word("Enter a word to search for in the AVL tree: ")?
                else {
                    return Ok(Flow::Quit);
                };
                match self.tree.search(&word) {
                    Some(node) => {
                        let count = node.count();
                        writeln!(
                            self.out,
                            "Found {} instance{} of '{}'",
                            count,
                            plural(count),
                            node.key()
                        )?;
                        if self.verbosity == Verbosity::Verbose {
                            writeln!(self.out, "Node is at {:p}", node)?;
                        }
                    }
                    None => writeln!(self.out, "Word not found.")?,
                }
            }
            MenuCommand::Delete => {
                let Some(word) = self.read_word("Enter a word to delete from the AVL tree: ")?
                else {
                    return Ok(Flow::Quit);
                };
                let was_empty = self.tree.is_empty();
                match self.tree.delete(&word) {
                    Ok(Deletion::Decremented { remaining }) => writeln!(
                        self.out,
                        "Removed one instance of '{}'; {} remaining.",
                        word, remaining
                    )?,
                    Ok(Deletion::Removed) => {
                        writeln!(self.out, "Removed '{}' from the tree.", word)?
                    }
                    Err(Error::NotFound { .. }) if was_empty => {
                        writeln!(self.out, "Tree is empty. Cannot remove '{}'.", word)?
                    }
                    Err(Error::NotFound { .. }) => {
                        writeln!(self.out, "{} not found. Unable to delete.", word)?
                    }
                    Err(e) => return Err(e),
                }
            }
            MenuCommand::View => {
                let view = self.tree.render(Verbosity::Simple);
                self.out.write_all(view.as_bytes())?;
            }
            MenuCommand::VerboseView => {
                let view = self.tree.render(Verbosity::Verbose);
                self.out.write_all(view.as_bytes())?;
            }
            MenuCommand::Import => match self.browse()? {
                Browse::Selected(reader, name) => match import_reader(&mut *self.tree, reader) {
                    Ok(summary) => writeln!(
                        self.out,
                        "# Imported {} words ({} new) from {}.",
                        summary.words, summary.added, name
                    )?,
                    Err(e) => {
                        warn!(file = %name, error = %e, "import failed");
                        writeln!(self.out, "# Import failed: {}", e)?;
                    }
                },
                Browse::Cancelled => {}
                Browse::Eof => return Ok(Flow::Quit),
            },
            MenuCommand::Exit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    // =========================================================================
    // File browser sub-loop
    // =========================================================================

    fn browse(&mut self) -> Result<Browse> {
        writeln!(
            self.out,
            "#########################################################\n\
             # Welcome to a low-level file navigation and input system\n\
             #   ls: lists the files in the current working directory\n\
             #   cd: change the current working directory\n\
             #   select: choose a *.txt file to import into the AVL tree\n\
             #   exit: exits this file browser\n\
             #########################################################"
        )?;
        writeln!(self.out, "{LINE_SEP}")?;
        self.file_instructions()?;

        loop {
            writeln!(self.out, "{LINE_SEP}")?;
            writeln!(self.out, "# PWD: {}", self.browser.cwd().display())?;
            self.prompt("# Enter a command: ")?;
            let Some(line) = self.read_line()? else {
                return Ok(Browse::Eof);
            };

            match BrowseCommand::parse(&line) {
                Some(BrowseCommand::List) => self.list()?,
                Some(BrowseCommand::ChangeDir) => {
                    if self.change_dir()? == Flow::Quit {
                        return Ok(Browse::Eof);
                    }
                }
                Some(BrowseCommand::Select) => match self.select()? {
                    Browse::Cancelled => {}
                    done => return Ok(done),
                },
                Some(BrowseCommand::Exit) => {
                    writeln!(self.out, "# Exiting file browser...")?;
                    return Ok(Browse::Cancelled);
                }
                None => {
                    writeln!(self.out, "# Invalid command!")?;
                    self.file_instructions()?;
                }
            }
        }
    }

    fn list(&mut self) -> Result<()> {
        match self.browser.entries() {
            Ok(entries) if entries.is_empty() => {
                writeln!(self.out, "# No directory entries found.")?;
            }
            Ok(entries) => {
                for entry in entries {
                    writeln!(self.out, "# {} - {}", entry.name, entry.kind.describe())?;
                }
            }
            Err(e) => {
                warn!(error = %e, "listing failed");
                writeln!(self.out, "# Couldn't open the directory!")?;
            }
        }
        Ok(())
    }

    fn change_dir(&mut self) -> Result<Flow> {
        let dirs = match self.browser.directories() {
            Ok(dirs) => dirs,
            Err(e) => {
                warn!(error = %e, "listing failed");
                writeln!(self.out, "# Couldn't open the directory!")?;
                return Ok(Flow::Continue);
            }
        };
        if dirs.is_empty() {
            writeln!(self.out, "# No directories found.")?;
            return Ok(Flow::Continue);
        }
        for (i, dir) in dirs.iter().enumerate() {
            writeln!(self.out, "# {}: {}", i, dir)?;
        }

        let Some(choice) = self.read_choice(
            "# Enter the number of the directory to move to: ",
            0,
            dirs.len() as i64,
        )?
        else {
            return Ok(Flow::Quit);
        };
        if let Err(e) = self.browser.change_dir(&dirs[choice as usize]) {
            warn!(error = %e, "change directory failed");
            writeln!(self.out, "# Unable to change directory.")?;
        }
        Ok(Flow::Continue)
    }

    fn select(&mut self) -> Result<Browse> {
        let files = match self.browser.text_files() {
            Ok(files) => files,
            Err(e) => {
                warn!(error = %e, "listing failed");
                writeln!(self.out, "# Couldn't open the current directory!")?;
                return Ok(Browse::Cancelled);
            }
        };
        if files.is_empty() {
            writeln!(self.out, "# No *.txt files in directory")?;
            return Ok(Browse::Cancelled);
        }

        writeln!(self.out, "# -1: Cancel")?;
        for (i, file) in files.iter().enumerate() {
            writeln!(self.out, "# {}: {}", i, file)?;
        }
        let Some(choice) = self.read_choice(
            "# Enter the number of the file to import: ",
            -1,
            files.len() as i64,
        )?
        else {
            return Ok(Browse::Eof);
        };
        if choice == -1 {
            return Ok(Browse::Cancelled);
        }

        let name = files[choice as usize].clone();
        match self.browser.open(&name) {
            Ok(reader) => Ok(Browse::Selected(reader, name)),
            Err(e) => {
                warn!(file = %name, error = %e, "open failed");
                writeln!(self.out, "# Could not open file.")?;
                Ok(Browse::Cancelled)
            }
        }
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    fn instructions(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "To insert a word: press 1\n\
             To locate a word: press 2\n\
             To delete a word: press 3\n\
             To view: press 4\n\
             To view verbosely: press 5\n\
             To import a *.txt file: press 6\n\
             To exit: press 7"
        )?;
        Ok(())
    }

    fn file_instructions(&mut self) -> Result<()> {
        writeln!(self.out, "# ls: 1\n# cd: 2\n# select: 3\n# exit: 4")?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    /// A line that is not valid UTF-8 is reported and comes back empty.
    fn read_line(&mut self) -> Result<Option<String>> {
        self.line.clear();
        if self.input.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(None);
        }
        match std::str::from_utf8(&self.line) {
            Ok(line) => Ok(Some(line.to_owned())),
            Err(e) => {
                warn!(error = %e, "rejected input line");
                writeln!(self.out, "Input must be valid UTF-8 text.")?;
                Ok(Some(String::new()))
            }
        }
    }

    /// Blank lines are skipped; malformed tokens are reported and re-prompted.
    fn read_word(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompt(prompt)?;
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let Some(word) = first_word(&line) else {
                continue;
            };
            match validate_key(word) {
                Ok(()) => return Ok(Some(word.to_owned())),
                Err(e) => {
                    warn!(input = ?word, error = %e, "rejected key");
                    writeln!(self.out, "{}", e)?;
                    self.prompt("Try again: ")?;
                }
            }
        }
    }

    /// An integer in `lo..hi`.
    fn read_choice(&mut self, prompt: &str, lo: i64, hi: i64) -> Result<Option<i64>> {
        self.prompt(prompt)?;
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.trim().parse::<i64>() {
                Ok(n) if (lo..hi).contains(&n) => return Ok(Some(n)),
                Ok(_) => {
                    writeln!(
                        self.out,
                        "# The number must be between {} and {}, inclusive.",
                        lo,
                        hi - 1
                    )?;
                    self.prompt("# Try again: ")?;
                }
                Err(_) => self.prompt("That wasn't even an integer. Try again: ")?,
            }
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Promotion, TreeConfig};
    use std::fs;
    use std::io::Cursor;

    fn run_script(tree: &mut WordTree, dir: &std::path::Path, script: &str) -> String {
        let mut out = Vec::new();
        let browser = FileBrowser::at(dir).unwrap();
        Shell::new(tree, Cursor::new(script.to_owned()), &mut out, browser)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_menu_parse() {
        assert_eq!(MenuCommand::parse("1\n"), Some(MenuCommand::Insert));
        assert_eq!(MenuCommand::parse(" Search "), Some(MenuCommand::Search));
        assert_eq!(MenuCommand::parse("7"), Some(MenuCommand::Exit));
        assert_eq!(MenuCommand::parse("8"), None);
        assert_eq!(BrowseCommand::parse("ls"), Some(BrowseCommand::List));
        assert_eq!(BrowseCommand::parse("0"), None);
    }

    #[test]
    fn test_insert_search_delete_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = WordTree::with_config(TreeConfig::new().promotion(Promotion::Successor));
        let out = run_script(
            &mut tree,
            dir.path(),
            "1\ncat\n1\ncat\n1\n\n   dog  extra\n2\ncat\n3\ncat\n3\nbird\n2\nbird\n7\n",
        );

        assert!(out.contains("'cat' now has 2 instances."), "{out}");
        assert!(out.contains("'dog' now has 1 instance."), "{out}");
        assert!(out.contains("Found 2 instances of 'cat'"), "{out}");
        assert!(out.contains("Removed one instance of 'cat'; 1 remaining."), "{out}");
        assert!(out.contains("bird not found. Unable to delete."), "{out}");
        assert!(out.contains("Word not found."), "{out}");
        assert!(out.ends_with("Exiting...\n-----------------------\n"), "{out}");

        assert_eq!(tree.count("cat"), Some(1));
        assert_eq!(tree.count("dog"), Some(1));
        assert!(!tree.contains("extra"));
    }

    #[test]
    fn test_delete_from_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = WordTree::new();
        let out = run_script(&mut tree, dir.path(), "delete\nghost\nexit\n");
        assert!(out.contains("Tree is empty. Cannot remove 'ghost'."), "{out}");
    }

    #[test]
    fn test_invalid_command_reprints_instructions() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = WordTree::new();
        let out = run_script(&mut tree, dir.path(), "42\n7\n");
        assert!(out.contains("Invalid command!\nTo insert a word: press 1"), "{out}");
    }

    #[test]
    fn test_end_of_input_exits() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = WordTree::new();
        let out = run_script(&mut tree, dir.path(), "1\n");
        assert!(out.ends_with("Exiting...\n-----------------------\n"), "{out}");
        assert!(tree.is_empty());
    }

    #[test]
    fn test_view_commands() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = WordTree::new();
        let out = run_script(&mut tree, dir.path(), "4\n1\nb\n1\na\n4\n5\n7\n");
        assert!(out.contains("Empty.\n"), "{out}");
        assert!(out.contains("b(1)\n\ta(1)\n"), "{out}");
        assert!(out.contains("|Node[word=b,count=1,height=2,balanceFactor=1]"), "{out}");
        assert!(out.contains("In order, words are: a b"), "{out}");
    }

    #[test]
    fn test_import_through_browser() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("texts")).unwrap();
        fs::write(dir.path().join("texts").join("poem.txt"), "Roses are red, roses are red").unwrap();
        fs::write(dir.path().join("readme.md"), "ignored").unwrap();

        let mut tree = WordTree::new();
        // ls, cd -> "texts" (index 2 after "." and ".."), bogus choice, select file 0, exit.
        let out = run_script(&mut tree, dir.path(), "6\n1\n2\nx\n9\n2\n3\n0\n7\n");

        assert!(out.contains("# readme.md - file"), "{out}");
        assert!(out.contains("# texts - directory"), "{out}");
        assert!(out.contains("That wasn't even an integer. Try again: "), "{out}");
        assert!(out.contains("# The number must be between 0 and 2, inclusive."), "{out}");
        assert!(out.contains("# Imported 6 words (4 new) from poem.txt."), "{out}");
        assert_eq!(tree.count("are"), Some(2));
        assert_eq!(tree.count("roses"), Some(1));
        assert_eq!(tree.count("red"), Some(2));
        assert_eq!(tree.count("Roses"), Some(1));
        assert_eq!(tree.total(), 6);
    }

    #[test]
    fn test_browser_cancel_and_exit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("words.txt"), "unused").unwrap();

        let mut tree = WordTree::new();
        let out = run_script(&mut tree, dir.path(), "6\n3\n-1\nnope\n4\n7\n");
        assert!(out.contains("# -1: Cancel\n# 0: words.txt\n"), "{out}");
        assert!(out.contains("# Invalid command!\n# ls: 1"), "{out}");
        assert!(out.contains("# Exiting file browser..."), "{out}");
        assert!(tree.is_empty());
    }

    #[test]
    fn test_select_without_text_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = WordTree::new();
        let out = run_script(&mut tree, dir.path(), "6\n3\n4\n7\n");
        assert!(out.contains("# No *.txt files in directory"), "{out}");
    }
    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = WordTree::new();
        let mut script = b"1\ncat\n1\n".to_vec();
        script.extend_from_slice(&[0xFF, 0xFE, b'\n']);
        script.extend_from_slice(b"dog\n2\ncat\n7\n");

        let mut out = Vec::new();
        let browser = FileBrowser::at(dir.path()).unwrap();
        Shell::new(&mut tree, Cursor::new(script), &mut out, browser)
            .run()
            .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Input must be valid UTF-8 text."), "{out}");
        assert!(out.contains("'dog' now has 1 instance."), "{out}");
        assert!(out.contains("Found 1 instance of 'cat'"), "{out}");
        assert!(out.ends_with("Exiting...\n-----------------------\n"), "{out}");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_cd_dot_stays_put() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let start = fs::canonicalize(dir.path()).unwrap();

        let mut tree = WordTree::new();
        let out = run_script(&mut tree, dir.path(), "6\n2\n0\n4\n7\n");
        assert!(out.contains("# 0: .\n# 1: ..\n# 2: sub\n"), "{out}");
        assert_eq!(out.matches(&format!("# PWD: {}\n", start.display())).count(), 2, "{out}");
    }
}

