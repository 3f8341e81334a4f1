//! In-memory doubles for driving installer stages without a terminal or host
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

use easy_install::InstallError;
use easy_install::Result;
use easy_install::prompt::Prompter;
use easy_install::system::{CommandOutcome, CommandRunner, Fetcher, Invocation, SystemProvider};

/// Prompter answering from a fixed script.
///
/// Visible and secret prompts share one queue. Running out of answers is an
/// error, which bounds any loop that keeps asking.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub messages: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn asked(&self, fragment: &str) -> usize {
        self.prompts.iter().filter(|p| p.contains(fragment)).count()
    }

    pub fn said(&self, fragment: &str) -> bool {
        self.messages.iter().any(|m| m.contains(fragment))
    }

    fn next(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| InstallError::Prompt(format!("script exhausted at '{prompt}'")))
    }
}

impl Prompter for ScriptedPrompter {
    fn line(&mut self, prompt: &str) -> Result<String> {
        self.next(prompt)
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        self.next(prompt)
    }

    fn say(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

#[derive(Default)]
struct HostState {
    users: HashMap<String, PathBuf>,
    groups: HashSet<String>,
    memberships: HashSet<(String, String)>,
    commands: HashSet<String>,
    scripts_run: Vec<String>,
    created_users: Vec<(String, String, String)>,
}

/// Host kept in memory
#[derive(Default)]
pub struct FakeProvider {
    pub privileged: bool,
    /// `useradd` reports success without creating the account
    pub silent_create_failure: bool,
    pub fail_create_user: bool,
    pub fail_group_add: bool,
    /// Commands that appear once an install script has run
    pub installed_by_script: Vec<String>,
    state: Mutex<HostState>,
}

impl FakeProvider {
    pub fn root() -> Self {
        Self {
            privileged: true,
            ..Self::default()
        }
    }

    pub fn with_commands(self, commands: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.commands.extend(commands.iter().map(|c| c.to_string()));
        }
        self
    }

    pub fn with_user(self, username: &str, home: impl Into<PathBuf>) -> Self {
        self.state
            .lock()
            .unwrap()
            .users
            .insert(username.to_string(), home.into());
        self
    }

    pub fn failing_user_creation(mut self) -> Self {
        self.fail_create_user = true;
        self
    }

    /// `useradd` succeeds but the account never shows up
    pub fn losing_created_users(mut self) -> Self {
        self.silent_create_failure = true;
        self
    }

    pub fn failing_group_add(mut self) -> Self {
        self.fail_group_add = true;
        self
    }

    pub fn installing_by_script(mut self, commands: &[&str]) -> Self {
        self.installed_by_script = commands.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_group(self, group: &str) -> Self {
        self.state.lock().unwrap().groups.insert(group.to_string());
        self
    }

    pub fn created_users(&self) -> Vec<(String, String, String)> {
        self.state.lock().unwrap().created_users.clone()
    }

    pub fn scripts_run(&self) -> Vec<String> {
        self.state.lock().unwrap().scripts_run.clone()
    }
}

impl SystemProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "Fake"
    }

    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn command_exists(&self, command: &str) -> bool {
        self.state.lock().unwrap().commands.contains(command)
    }

    fn run_shell_script(&self, script: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.scripts_run.push(script.to_string());
        let installed = self.installed_by_script.clone();
        state.commands.extend(installed);
        Ok(())
    }

    fn user_exists(&self, username: &str) -> bool {
        self.state.lock().unwrap().users.contains_key(username)
    }

    fn group_exists(&self, groupname: &str) -> bool {
        self.state.lock().unwrap().groups.contains(groupname)
    }

    fn user_in_group(&self, username: &str, groupname: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .memberships
            .contains(&(username.to_string(), groupname.to_string()))
    }

    fn user_home(&self, username: &str) -> Option<PathBuf> {
        self.state.lock().unwrap().users.get(username).cloned()
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        Ok(format!("$6$fake${}", password.len()))
    }

    fn create_user(&self, username: &str, password_hash: &str, shell: &str) -> Result<()> {
        if self.fail_create_user {
            return Err(InstallError::command(
                format!("useradd {username}"),
                "exit status: 9: useradd: cannot lock /etc/passwd",
            ));
        }
        let mut state = self.state.lock().unwrap();
        state.created_users.push((
            username.to_string(),
            password_hash.to_string(),
            shell.to_string(),
        ));
        if !self.silent_create_failure {
            state
                .users
                .insert(username.to_string(), PathBuf::from("/home").join(username));
        }
        Ok(())
    }

    fn create_group(&self, groupname: &str) -> Result<()> {
        self.state.lock().unwrap().groups.insert(groupname.to_string());
        Ok(())
    }

    fn add_user_to_group(&self, username: &str, groupname: &str) -> Result<()> {
        if self.fail_group_add {
            return Err(InstallError::command(
                format!("usermod --append --groups {groupname} {username}"),
                "exit status: 6",
            ));
        }
        self.state
            .lock()
            .unwrap()
            .memberships
            .insert((username.to_string(), groupname.to_string()));
        Ok(())
    }
}

type FailWhen = Box<dyn Fn(&Invocation) -> Option<CommandOutcome> + Send + Sync>;

/// Runner that records invocations instead of spawning processes.
///
/// `git clone` creates the destination directory so later file writes work.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    fail_when: Vec<FailWhen>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report exit status `code` for invocations whose rendered command line
    /// contains `fragment`
    pub fn failing_on(mut self, fragment: &str, code: i32) -> Self {
        let fragment = fragment.to_string();
        self.fail_when.push(Box::new(move |inv| {
            inv.to_string()
                .contains(&fragment)
                .then(|| CommandOutcome::failure(code))
        }));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.to_string()).collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutcome> {
        self.calls.lock().unwrap().push(invocation.clone());

        if let Some(outcome) = self.fail_when.iter().find_map(|f| f(invocation)) {
            return Ok(outcome);
        }

        if invocation.program == "git" && invocation.args.first().map(String::as_str) == Some("clone") {
            if let Some(dest) = invocation.args.last() {
                std::fs::create_dir_all(dest)?;
            }
        }
        Ok(CommandOutcome::success())
    }
}

/// Fetcher serving fixed bodies by URL
#[derive(Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serving(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.requested.lock().unwrap().push(url.to_string());
        self.bodies.get(url).cloned().ok_or_else(|| {
            InstallError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no body for {url}"),
            ))
        })
    }
}
