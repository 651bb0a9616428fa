//! Git-like text commands.
//!
//! The REPL and `-e` batch mode accept a small subset of git's porcelain.
//! A leading `git` is optional, so `git checkout feature` and
//! `checkout feature` are the same command. `switch` is an alias of
//! `checkout`.

use std::fmt;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: unexpected argument '{argument}'")]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },

    #[error("{command}: unknown option '{option}'")]
    UnknownOption {
        command: &'static str,
        option: String,
    },
}

/// One parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init,
    Commit,
    Amend,
    Branch(String),
    DeleteBranch(String),
    Checkout(String),
    Merge { no_fast_forward: bool, branch: String },
    Rebase(String),
    Tag(String),
    DeleteTag(String),
    CherryPick(String),
    Gc,
}

impl Command {
    /// Parse a single command line.
    pub fn parse(input: &str) -> ParseResult<Command> {
        let mut words: Vec<&str> = input.split_whitespace().collect();
        if words.first() == Some(&"git") {
            words.remove(0);
        }
        let Some((&name, args)) = words.split_first() else {
            return Err(ParseError::Empty);
        };

        match name.to_lowercase().as_str() {
            "init" => {
                no_args("init", args)?;
                Ok(Command::Init)
            }
            "commit" => match args {
                [] => Ok(Command::Commit),
                ["--amend"] => Ok(Command::Amend),
                [flag, ..] if flag.starts_with('-') && *flag != "--amend" => Err(ParseError::UnknownOption {
                    command: "commit",
                    option: flag.to_string(),
                }),
                [_, extra, ..] | [extra] => Err(ParseError::UnexpectedArgument {
                    command: "commit",
                    argument: extra.to_string(),
                }),
            },
            "branch" => match args {
                ["-d" | "-D" | "--delete", name] => Ok(Command::DeleteBranch(name.to_string())),
                ["-d" | "-D" | "--delete"] => Err(ParseError::MissingArgument {
                    command: "branch",
                    argument: "branch name",
                }),
                _ => one_arg("branch", "branch name", args).map(Command::Branch),
            },
            "checkout" | "switch" => one_arg("checkout", "branch, tag or commit", args).map(Command::Checkout),
            "merge" => {
                let (no_fast_forward, rest) = match args {
                    ["--no-ff", rest @ ..] => (true, rest),
                    ["--ff", rest @ ..] => (false, rest),
                    rest => (false, rest),
                };
                let branch = one_arg("merge", "branch name", rest)?;
                Ok(Command::Merge { no_fast_forward, branch })
            }
            "rebase" => one_arg("rebase", "branch name", args).map(Command::Rebase),
            "tag" => match args {
                ["-d" | "--delete", name] => Ok(Command::DeleteTag(name.to_string())),
                ["-d" | "--delete"] => Err(ParseError::MissingArgument {
                    command: "tag",
                    argument: "tag name",
                }),
                _ => one_arg("tag", "tag name", args).map(Command::Tag),
            },
            "cherry-pick" => one_arg("cherry-pick", "commit id", args).map(Command::CherryPick),
            "gc" => {
                no_args("gc", args)?;
                Ok(Command::Gc)
            }
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Init => write!(f, "git init"),
            Command::Commit => write!(f, "git commit"),
            Command::Amend => write!(f, "git commit --amend"),
            Command::Branch(name) => write!(f, "git branch {}", name),
            Command::DeleteBranch(name) => write!(f, "git branch -d {}", name),
            Command::Checkout(target) => write!(f, "git checkout {}", target),
            Command::Merge { no_fast_forward: true, branch } => write!(f, "git merge --no-ff {}", branch),
            Command::Merge { branch, .. } => write!(f, "git merge {}", branch),
            Command::Rebase(branch) => write!(f, "git rebase {}", branch),
            Command::Tag(name) => write!(f, "git tag {}", name),
            Command::DeleteTag(name) => write!(f, "git tag -d {}", name),
            Command::CherryPick(commit) => write!(f, "git cherry-pick {}", commit),
            Command::Gc => write!(f, "git gc"),
        }
    }
}

fn no_args(command: &'static str, args: &[&str]) -> ParseResult<()> {
    match args.first() {
        None => Ok(()),
        Some(arg) if arg.starts_with('-') => Err(ParseError::UnknownOption {
            command,
            option: arg.to_string(),
        }),
        Some(arg) => Err(ParseError::UnexpectedArgument {
            command,
            argument: arg.to_string(),
        }),
    }
}

fn one_arg(command: &'static str, argument: &'static str, args: &[&str]) -> ParseResult<String> {
    if let Some(option) = args.iter().find(|arg| arg.starts_with('-')) {
        return Err(ParseError::UnknownOption {
            command,
            option: option.to_string(),
        });
    }
    match args {
        [] => Err(ParseError::MissingArgument { command, argument }),
        [arg] => Ok(arg.to_string()),
        [_, extra, ..] => Err(ParseError::UnexpectedArgument {
            command,
            argument: extra.to_string(),
        }),
    }
}
