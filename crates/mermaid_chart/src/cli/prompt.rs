//! Interactive prompts and the project picker.
//!
//! The [`Prompt`] trait is the seam that keeps the picker testable: the real
//! implementation reads stdin, tests script their answers.

use std::io::{self, Write};

use mermaid_chart_core::error::{McError, Result};
use mermaid_chart_core::remote::{BoxFuture, RemoteClient};
use mermaid_chart_core::sync::{LinkCache, ProjectPicker};

/// Blocking user interaction. Implementations answer from stdin or, in
/// tests, from a script.
pub trait Prompt: Send + Sync {
    /// Yes/no question. `default_yes` is the answer for empty input.
    fn confirm(&self, message: &str, default_yes: bool) -> Result<bool>;

    /// Pick one of `choices`, returning its index (always `< choices.len()`).
    fn select(&self, message: &str, choices: &[String]) -> Result<usize>;

    /// Free-form input.
    fn input(&self, message: &str) -> Result<String>;
}

/// [`Prompt`] that talks to the terminal.
pub struct StdinPrompt;

impl StdinPrompt {
    fn read_line(&self) -> Result<String> {
        io::stdout()
            .flush()
            .map_err(|e| McError::Prompt(e.to_string()))?;
        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .map_err(|e| McError::Prompt(e.to_string()))?;
        Ok(input.trim().to_string())
    }
}

impl Prompt for StdinPrompt {
    fn confirm(&self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
        loop {
            print!("{message} {hint} ");
            let input = self.read_line()?.to_lowercase();
            match input.as_str() {
                "" => return Ok(default_yes),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("Please answer y or n."),
            }
        }
    }

    fn select(&self, message: &str, choices: &[String]) -> Result<usize> {
        println!("{message}");
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}) {}", i + 1, choice);
        }
        loop {
            print!("Enter a number [1-{}]: ", choices.len());
            let input = self.read_line()?;
            match input.parse::<usize>() {
                Ok(n) if n >= 1 && n <= choices.len() => return Ok(n - 1),
                _ => println!("Please enter a number between 1 and {}.", choices.len()),
            }
        }
    }

    fn input(&self, message: &str) -> Result<String> {
        println!("{message}");
        print!("> ");
        self.read_line()
    }
}

/// Interactive [`ProjectPicker`].
///
/// Asks once per `link` invocation whether to reuse the previously selected
/// project for all remaining diagrams, and memoizes both the answer and the
/// fetched project list in the [`LinkCache`].
pub struct InteractivePicker<'c, P: Prompt> {
    client: &'c dyn RemoteClient,
    prompt: P,
}

impl<'c, P: Prompt> InteractivePicker<'c, P> {
    pub fn new(client: &'c dyn RemoteClient, prompt: P) -> Self {
        Self { client, prompt }
    }
}

impl<P: Prompt> ProjectPicker for InteractivePicker<'_, P> {
    fn pick_project<'a>(
        &'a self,
        cache: &'a mut LinkCache,
        title: &'a str,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            if let Some(previous) = cache.previous_project_id.clone() {
                let reuse = match cache.reuse_previous {
                    Some(answer) => answer,
                    None => {
                        let answer = self.prompt.confirm(
                            "Would you like to upload all diagrams to this project?",
                            true,
                        )?;
                        cache.reuse_previous = Some(answer);
                        answer
                    }
                };
                if reuse {
                    return Ok(previous);
                }
            }

            if cache.projects.is_none() {
                cache.projects = Some(self.client.get_projects().await?);
            }
            let projects = cache.projects.as_deref().unwrap_or_default();
            if projects.is_empty() {
                return Err(McError::Prompt(format!(
                    "You have no projects. Go to {}/app/projects to create one.",
                    self.client.base_url()
                )));
            }

            let choices: Vec<String> = projects.iter().map(|p| p.title.clone()).collect();
            println!(
                "Or go to {}/app/projects to create a new project",
                self.client.base_url()
            );
            let index = self
                .prompt
                .select(&format!("Select a project to upload {title} to"), &choices)?;
            let project = projects.get(index).ok_or_else(|| {
                McError::Prompt(format!("selection {index} out of range"))
            })?;

            let project_id = project.id.clone();
            cache.previous_project_id = Some(project_id.clone());
            Ok(project_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::testing::{MockClient, ScriptedPrompt};

    #[tokio::test]
    async fn test_picker_memoizes_reuse_answer() {
        let client = MockClient::new();
        let prompt = ScriptedPrompt::new().confirm_with(true).select_index(0);
        let picker = InteractivePicker::new(&client, prompt);
        let mut cache = LinkCache::default();

        let first = picker.pick_project(&mut cache, "a.mmd").await.unwrap();
        let second = picker.pick_project(&mut cache, "b.mmd").await.unwrap();
        let third = picker.pick_project(&mut cache, "c.mmd").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
        // One selection, one reuse question, one project fetch.
        assert_eq!(picker.prompt.select_count(), 1);
        assert_eq!(picker.prompt.confirm_count(), 1);
        assert_eq!(client.get_projects_calls(), 1);
    }

    #[tokio::test]
    async fn test_picker_asks_again_when_reuse_declined() {
        let client = MockClient::new();
        let prompt = ScriptedPrompt::new().confirm_with(false).select_index(0);
        let picker = InteractivePicker::new(&client, prompt);
        let mut cache = LinkCache::default();

        picker.pick_project(&mut cache, "a.mmd").await.unwrap();
        picker.pick_project(&mut cache, "b.mmd").await.unwrap();
        picker.pick_project(&mut cache, "c.mmd").await.unwrap();

        assert_eq!(picker.prompt.select_count(), 3);
        // The reuse question is only asked once; the answer is memoized.
        assert_eq!(picker.prompt.confirm_count(), 1);
        // The project list is still only fetched once.
        assert_eq!(client.get_projects_calls(), 1);
    }
}
