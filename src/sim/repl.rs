//! Interactive REPL (Read-Eval-Print Loop) for the simulator.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use super::api::{Simulator, SimulatorResult};
use super::render::render_graph;

/// REPL configuration.
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string.
    pub prompt: String,
    /// Show timing information.
    pub timing: bool,
    /// Draw the graph after every command that changed it.
    pub show_graph: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "gitgraph> ".into(),
            timing: false,
            show_graph: true,
        }
    }
}

/// The interactive REPL.
pub struct Repl {
    sim: Simulator,
    config: ReplConfig,
}

impl Repl {
    /// Create a new REPL around the given simulator.
    pub fn new(sim: Simulator) -> Self {
        Self {
            sim,
            config: ReplConfig::default(),
        }
    }

    /// Create a REPL with custom configuration.
    pub fn with_config(sim: Simulator, config: ReplConfig) -> Self {
        Self { sim, config }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    /// Run the REPL on stdin/stdout.
    pub fn run(&mut self) -> SimulatorResult<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.print_banner(&mut stdout)?;
        self.run_with(stdin.lock(), &mut stdout)
    }

    /// Run the REPL until `.quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> SimulatorResult<()> {
        loop {
            write!(out, "{}", self.config.prompt)?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // EOF.
                writeln!(out, "\nGoodbye!")?;
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if self.is_command(line) {
                match self.handle_command(line, out) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
                continue;
            }

            let start = Instant::now();
            match self.sim.execute(line) {
                Ok(result) => {
                    writeln!(out, "{}", result)?;
                    if self.config.show_graph {
                        write!(out, "{}", self.sim.with_graph(render_graph))?;
                    }
                    if self.config.timing {
                        writeln!(out, "Time: {:.3}ms", start.elapsed().as_secs_f64() * 1000.0)?;
                    }
                }
                Err(e) => writeln!(out, "Error: {}", e)?,
            }
        }

        Ok(())
    }

    fn print_banner<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "╔═══════════════════════════════════════════════════╗")?;
        writeln!(out, "║                 GitGraph v{:<24}║", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "║      An interactive Git commit graph simulator    ║")?;
        writeln!(out, "╠═══════════════════════════════════════════════════╣")?;
        writeln!(out, "║  Type .help for commands, or enter git commands   ║")?;
        writeln!(out, "╚═══════════════════════════════════════════════════╝")?;
        writeln!(out)?;
        write!(out, "{}", self.sim.with_graph(render_graph))
    }

    fn is_command(&self, input: &str) -> bool {
        input.starts_with('.') || input.starts_with('\\')
    }

    fn handle_command<W: Write>(&mut self, cmd: &str, out: &mut W) -> SimulatorResult<bool> {
        let cmd = cmd.trim_start_matches(&['.', '\\'][..]);
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        let command = parts.first().map(|s| s.to_lowercase());

        match command.as_deref() {
            Some("help") | Some("h") | Some("?") => {
                self.print_help(out)?;
            }
            Some("quit") | Some("exit") | Some("q") => {
                return Ok(true);
            }
            Some("log") | Some("graph") => {
                write!(out, "{}", self.sim.with_graph(render_graph))?;
            }
            Some("json") => {
                let json = self.sim.snapshot().to_json()?;
                match parts.get(1) {
                    Some(path) => {
                        std::fs::write(path, json)?;
                        writeln!(out, "Snapshot written to {}", path)?;
                    }
                    None => writeln!(out, "{}", json)?,
                }
            }
            Some("lost") => match parts.get(1).map(|s| s.to_lowercase()).as_deref() {
                Some("on") => {
                    self.sim.show_lost_commits(true);
                    writeln!(out, "Lost commits: shown")?;
                }
                Some("off") => {
                    self.sim.show_lost_commits(false);
                    writeln!(out, "Lost commits: hidden")?;
                }
                _ => writeln!(out, "Usage: .lost on|off")?,
            },
            Some("reset") => {
                self.sim.reset()?;
                writeln!(out, "Started a new graph")?;
                write!(out, "{}", self.sim.with_graph(render_graph))?;
            }
            Some("history") => {
                writeln!(out, "Command History:")?;
                for (i, cmd) in self.sim.history().iter().enumerate() {
                    writeln!(out, "  {}: {}", i + 1, cmd)?;
                }
            }
            Some("timing") => {
                self.config.timing = !self.config.timing;
                writeln!(out, "Timing: {}", if self.config.timing { "on" } else { "off" })?;
            }
            Some("clear") => {
                // Clear screen (ANSI escape).
                write!(out, "\x1B[2J\x1B[H")?;
            }
            Some(cmd) => {
                writeln!(out, "Unknown command: .{}", cmd)?;
                writeln!(out, "Type .help for available commands")?;
            }
            None => {}
        }

        Ok(false)
    }

    fn print_help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Commands:")?;
        writeln!(out, "  .help, .h, .?           Show this help message")?;
        writeln!(out, "  .quit, .exit, .q        Exit the REPL")?;
        writeln!(out, "  .log, .graph            Draw the commit graph")?;
        writeln!(out, "  .json [path]            Print or save the graph as JSON")?;
        writeln!(out, "  .lost on|off            Show or hide lost commits")?;
        writeln!(out, "  .reset                  Start over with a fresh graph")?;
        writeln!(out, "  .history                Show command history")?;
        writeln!(out, "  .timing                 Toggle timing display")?;
        writeln!(out, "  .clear                  Clear the screen")?;
        writeln!(out)?;
        writeln!(out, "Git commands (the leading 'git' is optional):")?;
        writeln!(out, "  commit [--amend]")?;
        writeln!(out, "  branch <name> | branch -d <name>")?;
        writeln!(out, "  checkout <branch|tag|commit>")?;
        writeln!(out, "  merge [--no-ff] <branch>")?;
        writeln!(out, "  rebase <branch>")?;
        writeln!(out, "  tag <name> | tag -d <name>")?;
        writeln!(out, "  cherry-pick <commit>")?;
        writeln!(out, "  gc")?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatorConfig;
    use std::io::Cursor;

    fn run(script: &str) -> (Repl, String) {
        let sim = Simulator::new(SimulatorConfig::default()).unwrap();
        let mut repl = Repl::new(sim);
        let mut out = Vec::new();
        repl.run_with(Cursor::new(script.to_string()), &mut out).unwrap();
        (repl, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_runs_git_commands_until_eof() {
        let (repl, out) = run("commit\nbranch feature\n\ncommit\n");
        assert!(out.contains("[master] m2"));
        assert!(out.contains("Switched to a new branch 'feature'"));
        assert!(out.contains("* m2"));
        assert!(out.ends_with("Goodbye!\n"));
        assert_eq!(repl.simulator().history().len(), 3);
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let (repl, out) = run("checkout nowhere\npush\ncommit\n.quit\ncommit\n");
        assert!(out.contains("Error: ref not found"));
        assert!(out.contains("Error: parse error: unknown command: push"));
        assert!(!out.contains("Goodbye!"));
        assert_eq!(repl.simulator().history(), ["git commit"]);
    }

    #[test]
    fn test_dot_commands() {
        let (repl, out) = run(".lost off\n.history\n.timing\n.frobnicate\n.reset\n");
        assert!(out.contains("Lost commits: hidden"));
        assert!(out.contains("Timing: on"));
        assert!(out.contains("Unknown command: .frobnicate"));
        assert!(out.contains("Started a new graph"));
        assert!(!repl.simulator().lost_commits_visible());
    }

    #[test]
    fn test_json_export() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        let (_, out) = run(&format!("tag v1\n.json {}\n", path.display()));
        assert!(out.contains("Snapshot written to"));

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["tags"][0]["name"], "v1");
    }
}
