//! Line-oriented console front-end
//!
//! Reads commands from any async line source and writes results to any
//! writer, so the whole loop can be driven from tests. Multi-line input
//! (`edit`, `stdin`) is terminated by a line holding a single `.`.

use std::io::Write;

use chrono::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{
    constants::messages,
    editor::Workspace,
    error::{ClientError, ClientResult},
    models::{Language, SubmissionOutcome},
    services::TickEvent,
    state::AppState,
    utils::{format_countdown, format_duration},
};

const HELP: &str = "\
Commands:
  login <team> <password>   start or resume the contest
  logout                    end the session and clear local state
  problems                  list challenges and progress
  open <id>                 open a challenge in the editor
  lang <language>           switch language (python, javascript, java, cpp, c, csharp)
  edit                      replace the code; finish with a line containing '.'
  undo | redo               step through your edits
  reset                     restore the starter code
  show                      print the current code
  stdin                     set custom input; finish with a line containing '.'
  run                       run once with the custom input
  test                      run all visible test cases
  submit                    submit the current code
  status                    refresh submission results
  time                      show remaining time
  help | quit";

/// Parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { team: String, password: String },
    Logout,
    Problems,
    Open(i64),
    Lang(Language),
    Edit,
    Undo,
    Redo,
    Reset,
    Show,
    Stdin,
    Run,
    Test,
    Submit,
    Status,
    Time,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> ClientResult<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ClientError::Validation("Type 'help' for commands.".to_string()));
        };
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("login", [team, password]) => Self::Login {
                team: team.to_string(),
                password: password.to_string(),
            },
            ("login", _) => {
                return Err(ClientError::Validation(
                    "Usage: login <team> <password>".to_string(),
                ));
            }
            ("logout", []) => Self::Logout,
            ("problems", []) => Self::Problems,
            ("open", [id]) => Self::Open(
                id.parse()
                    .map_err(|_| ClientError::Validation(format!("Invalid challenge id: {id}")))?,
            ),
            ("lang", [language]) => Self::Lang(language.parse()?),
            ("edit", []) => Self::Edit,
            ("undo", []) => Self::Undo,
            ("redo", []) => Self::Redo,
            ("reset", []) => Self::Reset,
            ("show", []) => Self::Show,
            ("stdin", []) => Self::Stdin,
            ("run", []) => Self::Run,
            ("test", []) => Self::Test,
            ("submit", []) => Self::Submit,
            ("status", []) => Self::Status,
            ("time", []) => Self::Time,
            ("help", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            _ => {
                return Err(ClientError::Validation(format!(
                    "Unknown command: {line}. Type 'help' for commands."
                )));
            }
        };
        Ok(command)
    }
}

/// Target of a multi-line capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Code,
    Stdin,
}

/// Whether the loop should keep reading
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

enum Input {
    Line(Option<String>),
    Tick(Option<TickEvent>),
}

pub struct Console<W> {
    state: AppState,
    out: W,
    workspace: Option<Workspace>,
    capture: Option<(Capture, Vec<String>)>,
    ticker: Option<(mpsc::Receiver<TickEvent>, JoinHandle<()>)>,
}

impl<W: Write> Console<W> {
    pub fn new(state: AppState, out: W) -> Self {
        Self {
            state,
            out,
            workspace: None,
            capture: None,
            ticker: None,
        }
    }

    /// Drive the loop until `quit` or end of input; returns the writer
    pub async fn run<R>(mut self, input: R) -> anyhow::Result<W>
    where
        R: AsyncBufRead + Unpin,
    {
        self.resume()?;
        let mut lines = input.lines();

        loop {
            let input = tokio::select! {
                line = lines.next_line() => Input::Line(line?),
                tick = next_tick(&mut self.ticker) => Input::Tick(tick),
            };

            match input {
                Input::Line(None) => break,
                Input::Line(Some(line)) => {
                    if self.handle_line(&line).await? == Flow::Quit {
                        break;
                    }
                }
                Input::Tick(Some(TickEvent::Expired)) => self.expire()?,
                Input::Tick(Some(TickEvent::Tick { .. })) => {}
                Input::Tick(None) => self.stop_ticker(),
            }
        }

        self.stop_ticker();
        Ok(self.out)
    }

    /// Pick up a session persisted by an earlier run
    fn resume(&mut self) -> anyhow::Result<()> {
        match self.state.session().current_session() {
            Ok(session) => {
                writeln!(
                    self.out,
                    "Welcome back, {}. {} remaining.",
                    session.team.team_name,
                    format_countdown(session.remaining_seconds)
                )?;
                self.start_ticker(session.start);
            }
            Err(ClientError::SessionExpired) => writeln!(self.out, "{}", messages::TIME_UP)?,
            Err(ClientError::NotAuthenticated) => {
                writeln!(self.out, "Please log in. Type 'help' for commands.")?
            }
            Err(e) => writeln!(self.out, "{}", e.user_message())?,
        }
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        if let Some((target, mut lines)) = self.capture.take() {
            if line.trim() == "." {
                self.finish_capture(target, lines.join("\n"))?;
            } else {
                lines.push(line.to_string());
                self.capture = Some((target, lines));
            }
            return Ok(Flow::Continue);
        }

        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        let outcome = match Command::parse(line) {
            Ok(Command::Quit) => return Ok(Flow::Quit),
            Ok(command) => self.execute(command).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(text) if text.is_empty() => {}
            Ok(text) => writeln!(self.out, "{}", text.trim_end())?,
            Err(e) => {
                if e.requires_login() {
                    self.workspace = None;
                    self.stop_ticker();
                }
                tracing::debug!(code = e.error_code(), "Command failed");
                writeln!(self.out, "{}", e.user_message())?;
            }
        }
        Ok(Flow::Continue)
    }

    fn finish_capture(&mut self, target: Capture, text: String) -> anyhow::Result<()> {
        let Some(workspace) = self.workspace.as_mut() else {
            return Ok(());
        };
        match target {
            Capture::Code => {
                let message = if workspace.edit(text) {
                    "Code updated."
                } else {
                    "No changes."
                };
                writeln!(self.out, "{message}")?;
            }
            Capture::Stdin => {
                workspace.set_stdin(text);
                writeln!(self.out, "Custom input set.")?;
            }
        }
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> ClientResult<String> {
        match command {
            Command::Login { team, password } => {
                let session = self.state.session().login(&team, &password).await?;
                self.workspace = None;
                self.start_ticker(session.start);
                Ok(format!(
                    "Logged in as {}. {} remaining.",
                    session.team.team_name,
                    format_countdown(session.remaining_seconds)
                ))
            }
            Command::Logout => {
                self.state.session().logout()?;
                self.workspace = None;
                self.stop_ticker();
                Ok("Logged out.".to_string())
            }
            Command::Problems => self.list_problems().await,
            Command::Open(id) => {
                let problem = self.state.session().problem(id).await?;
                let mut text = format!("Opened {}: {}\n", problem.id, problem.title);
                if let Some(link) = problem.external_link() {
                    text.push_str(&format!("Buggy code: {link}\n"));
                }
                if !self.state.submission().can_submit(problem.id)? {
                    text.push_str("This challenge is already solved.\n");
                }
                let workspace = Workspace::open(problem);
                text.push_str(workspace.code());
                self.workspace = Some(workspace);
                Ok(text)
            }
            Command::Lang(language) => {
                let workspace = self.workspace_mut()?;
                workspace.switch_language(language);
                Ok(format!("Language: {}\n{}", language.label(), workspace.code()))
            }
            Command::Edit => {
                self.workspace_mut()?;
                self.capture = Some((Capture::Code, Vec::new()));
                Ok("Enter code, then '.' on its own line.".to_string())
            }
            Command::Stdin => {
                self.workspace_mut()?;
                self.capture = Some((Capture::Stdin, Vec::new()));
                Ok("Enter input, then '.' on its own line.".to_string())
            }
            Command::Undo => {
                let workspace = self.workspace_mut()?;
                Ok(if workspace.undo() {
                    workspace.code().to_string()
                } else {
                    "Nothing to undo.".to_string()
                })
            }
            Command::Redo => {
                let workspace = self.workspace_mut()?;
                Ok(if workspace.redo() {
                    workspace.code().to_string()
                } else {
                    "Nothing to redo.".to_string()
                })
            }
            Command::Reset => {
                let workspace = self.workspace_mut()?;
                workspace.reset();
                Ok(workspace.code().to_string())
            }
            Command::Show => {
                let workspace = self.workspace_mut()?;
                let history = workspace.history();
                Ok(format!(
                    "[{}] {} (undo {}, redo {})\n{}",
                    workspace.language().label(),
                    workspace.problem().title,
                    history.undo_depth(),
                    history.redo_depth(),
                    workspace.code()
                ))
            }
            Command::Run => {
                let workspace = self.workspace()?;
                let result = workspace.run(self.state.execution()).await?;
                if result.is_error() {
                    return Err(ClientError::ExecutionError);
                }
                Ok(result.display_output())
            }
            Command::Test => {
                let workspace = self.workspace()?;
                let report = workspace.run_tests(self.state.execution()).await?;
                Ok(format!("{}\n{}", report.render(), report.summary()))
            }
            Command::Submit => {
                let workspace = self.workspace()?;
                let outcome: SubmissionOutcome = workspace.submit(self.state.submission()).await?;
                Ok(outcome.to_string())
            }
            Command::Status => {
                let sync = self.state.session().sync_submissions().await?;
                let mut text = String::new();
                if let Some(warning) = sync.warning {
                    text.push_str(&warning.user_message());
                    text.push('\n');
                }
                for (problem_id, status) in &sync.status.statuses {
                    text.push_str(&format!("Challenge {problem_id}: {status}\n"));
                }
                text.push_str(&format!("Solved: {}", sync.status.solved_count()));
                Ok(text)
            }
            Command::Time => {
                let session = self.state.session().current_session()?;
                let elapsed = Duration::seconds(session.duration_seconds - session.remaining_seconds);
                Ok(format!(
                    "{} remaining ({} elapsed)",
                    format_countdown(session.remaining_seconds),
                    format_duration(elapsed)
                ))
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    async fn list_problems(&self) -> ClientResult<String> {
        let problems = self.state.session().load_problems().await?;
        let sync = self.state.session().sync_submissions().await?;

        let mut text = String::new();
        if let Some(warning) = sync.warning {
            text.push_str(&warning.user_message());
            text.push('\n');
        }
        for problem in &problems.problems {
            let marker = if sync.status.is_solved(problem.id) { "[solved]" } else { "" };
            text.push_str(&format!("{:>3}  {} {}\n", problem.id, problem.title, marker));
        }
        text.push_str(&format!(
            "Progress: {}/{} solved",
            sync.status.solved_count(),
            problems.len()
        ));
        Ok(text)
    }

    fn workspace(&self) -> ClientResult<&Workspace> {
        self.workspace
            .as_ref()
            .ok_or_else(|| ClientError::Validation("Open a challenge first.".to_string()))
    }

    fn workspace_mut(&mut self) -> ClientResult<&mut Workspace> {
        self.workspace
            .as_mut()
            .ok_or_else(|| ClientError::Validation("Open a challenge first.".to_string()))
    }

    fn start_ticker(&mut self, start: chrono::DateTime<chrono::Utc>) {
        self.stop_ticker();
        self.ticker = Some(self.state.session().clock().spawn_ticker(start));
    }

    fn stop_ticker(&mut self) {
        if let Some((_, handle)) = self.ticker.take() {
            handle.abort();
        }
    }

    /// The countdown reached zero
    fn expire(&mut self) -> anyhow::Result<()> {
        self.stop_ticker();
        self.workspace = None;
        self.capture = None;
        // Reading the session destroys it and its caches.
        if let Err(e) = self.state.session().current_session() {
            tracing::debug!(code = e.error_code(), "Session closed on expiry");
        }
        writeln!(self.out, "{}", messages::TIME_UP)?;
        Ok(())
    }
}

async fn next_tick(ticker: &mut Option<(mpsc::Receiver<TickEvent>, JoinHandle<()>)>) -> Option<TickEvent> {
    match ticker {
        Some((rx, _)) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::response::{PhaseOutput, RunResponse};
    use crate::config::Config;
    use crate::models::TestCase;
    use crate::storage::MemoryRepository;
    use crate::test_utils::{FakeBackend, ManualClock};
    use chrono::Utc;
    use std::sync::Arc;

    async fn drive(backend: Arc<FakeBackend>, script: &str) -> String {
        let state = AppState::new(
            Config::default(),
            backend,
            Arc::new(MemoryRepository::new()),
            Arc::new(ManualClock::new(Utc::now())),
        );
        let out = Console::new(state, Vec::new())
            .run(script.as_bytes())
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("open 3").unwrap(), Command::Open(3));
        assert_eq!(Command::parse("lang cpp").unwrap(), Command::Lang(Language::Cpp));
        assert!(matches!(Command::parse("lang cobol"), Err(ClientError::Validation(_))));
        assert!(matches!(Command::parse("login onlyname"), Err(ClientError::Validation(_))));
        assert!(matches!(Command::parse("dance"), Err(ClientError::Validation(_))));
    }

    #[tokio::test]
    async fn test_requires_login() {
        let output = drive(Arc::new(FakeBackend::default()), "problems\nquit\n").await;
        assert!(output.contains("Please log in to continue."));
    }

    #[tokio::test]
    async fn test_full_flow() {
        let backend = Arc::new(FakeBackend::default());
        *backend.test_cases.lock().unwrap() = vec![
            TestCase::visible("2 3", "5"),
            TestCase::hidden("1 1", "2"),
        ];
        let script = "\
login dragon warrior
problems
open 1
lang cpp
edit
int main() { return 0; }
.
undo
test
submit
submit
quit
";
        let output = drive(backend.clone(), script).await;

        assert!(output.contains("Logged in as dragon. 60:00 remaining."));
        assert!(output.contains("Progress: 0/2 solved"));
        assert!(output.contains("int add(int a, int b)"));
        assert!(output.contains("Code updated."));
        assert!(output.contains("Test Results: 1/1 passed"));
        assert!(output.contains("Submission accepted!"));
        assert!(output.contains("This challenge is already solved."));
        assert_eq!(backend.calls("submit"), 1);
    }

    #[tokio::test]
    async fn test_blank_code_guard() {
        let output = drive(
            Arc::new(FakeBackend::default()),
            "login dragon warrior\nopen 2\nrun\nquit\n",
        )
        .await;
        assert!(output.contains("Buggy code: https://files.example.com/monkey.py"));
        assert!(output.contains(messages::EMPTY_CODE));
    }

    #[tokio::test]
    async fn test_failed_run_shows_generic_message() {
        let backend = Arc::new(FakeBackend::default());
        *backend.run_response.lock().unwrap() = RunResponse {
            run: Some(PhaseOutput {
                stdout: Some("partial\n".to_string()),
                stderr: Some("Traceback: /srv/judge/secret.py line 3".to_string()),
                ..PhaseOutput::default()
            }),
            ..RunResponse::default()
        };
        let output = drive(backend, "login dragon warrior\nopen 1\nrun\nquit\n").await;

        assert!(output.contains(messages::EXECUTION_FAILED));
        assert!(!output.contains("secret.py"));
    }

    #[tokio::test]
    async fn test_show_reports_history_depth() {
        let script = "\
login dragon warrior
open 1
edit
print(1)
.
edit
print(2)
.
undo
show
quit
";
        let output = drive(Arc::new(FakeBackend::default()), script).await;
        assert!(output.contains("(undo 1, redo 1)"));
        assert!(output.contains("print(1)"));
    }
}
