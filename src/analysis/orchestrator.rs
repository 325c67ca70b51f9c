//! Analysis orchestrator - drives the fixed task pipeline over a corpus.
//!
//! The orchestrator owns task ordering and the per-task state machine
//! (`Pending -> Running -> Succeeded | Failed`). Tasks run strictly
//! sequentially: the terminal correlation task consumes earlier outputs, so
//! task i must finish before task i+1 starts. Each task's LLM call goes
//! through the shared rate limiter and the retry policy; a task that exhausts
//! its retries becomes a failure result and the loop moves on. The caller
//! observes every terminal result, in task order, through its callback.

use std::collections::HashMap;
use std::sync::Arc;

use crate::analysis::cancel::CancelFlag;
use crate::analysis::prior::format_previous_results;
use crate::analysis::rate_limit::RateLimiter;
use crate::analysis::retry::RetryPolicy;
use crate::corpus::select_top_posts;
use crate::domain::{Post, ResultStore, TaskResult, TaskSpec, task_catalog};
use crate::error::{RedsiftError, Result};
use crate::llm::{ChatMessage, LlmClient, extract_text};
use crate::prompt::{PromptCatalog, TaskComponents};

/// Parameters for one analysis run.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// How many top-scoring posts form the corpus
    pub num_top_posts: usize,

    /// Comments scoring strictly below this are dropped from the corpus
    pub min_comment_score: i64,

    /// Template variables ({{search_query}}, ...)
    pub variables: HashMap<String, String>,
}

impl RunParams {
    pub fn new(num_top_posts: usize, min_comment_score: i64) -> Self {
        Self {
            num_top_posts,
            min_comment_score,
            variables: HashMap::new(),
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every task reached a terminal state
    Completed,
    /// The cancel flag stopped the run between tasks
    Cancelled,
}

/// Everything a finished (or cancelled) run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: RunOutcome,

    /// Terminal results in task order, failures included
    pub results: Vec<TaskResult>,

    /// Size of the filtered corpus every task saw
    pub posts_analyzed: usize,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// The core pipeline driver. Generic over the LLM client so tests can
/// substitute a scripted mock.
pub struct AnalysisOrchestrator<C: LlmClient> {
    llm: Arc<C>,
    limiter: RateLimiter,
    retry: RetryPolicy,
    catalog: PromptCatalog,
    tasks: &'static [TaskSpec],
}

impl<C: LlmClient> AnalysisOrchestrator<C> {
    /// Create an orchestrator with injected collaborators.
    pub fn new(
        llm: Arc<C>,
        limiter: RateLimiter,
        retry: RetryPolicy,
        catalog: PromptCatalog,
    ) -> Self {
        Self {
            llm,
            limiter,
            retry,
            catalog,
            tasks: task_catalog(),
        }
    }

    /// Run the full pipeline over `posts`, streaming each task's terminal
    /// result through `callback` in task order.
    ///
    /// Configuration problems (missing template, unresolved placeholder,
    /// unserializable corpus) abort before the first network call. Task-level
    /// failures do not: they become failure results and the loop continues.
    pub async fn run<F>(
        &self,
        posts: &[Post],
        params: &RunParams,
        cancel: &CancelFlag,
        mut callback: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&str, &TaskResult),
    {
        let corpus = select_top_posts(posts, params.num_top_posts, params.min_comment_score);
        let corpus_json = serde_json::to_string_pretty(&corpus)?;

        // Resolve every template up front: missing files or variables are
        // fatal configuration errors, not task failures.
        let components = self.catalog.resolve(self.tasks, &params.variables)?;

        tracing::info!(
            posts = corpus.len(),
            tasks = self.tasks.len(),
            "Starting analysis run"
        );

        let mut store = ResultStore::new();
        store.clear();
        let mut results = Vec::with_capacity(self.tasks.len());

        for task in self.tasks {
            if cancel.is_cancelled() {
                tracing::warn!(task = task.name, "Run cancelled before task");
                return Ok(RunSummary {
                    outcome: RunOutcome::Cancelled,
                    results,
                    posts_analyzed: corpus.len(),
                });
            }

            tracing::info!(task = task.name, number = task.number, "Task running");

            let task_components = components.get(task.name).ok_or_else(|| {
                RedsiftError::Template(format!("No resolved template for task '{}'", task.name))
            })?;
            let attempt_outcome = self
                .retry
                .run(cancel, || self.attempt_task(task, task_components, &corpus_json, &store))
                .await;

            let result = match attempt_outcome {
                Ok(analysis) => {
                    tracing::info!(task = task.name, "Task succeeded");
                    TaskResult::success(task, analysis, corpus.len())
                }
                Err(RedsiftError::Cancelled) => {
                    tracing::warn!(task = task.name, "Run cancelled during task");
                    return Ok(RunSummary {
                        outcome: RunOutcome::Cancelled,
                        results,
                        posts_analyzed: corpus.len(),
                    });
                }
                Err(err) => {
                    tracing::error!(task = task.name, error = %err, "Task failed");
                    TaskResult::failure(task, err.to_string())
                }
            };

            if result.is_success() {
                store.insert(result.clone());
            }
            callback(task.name, &result);
            results.push(result);
        }

        Ok(RunSummary {
            outcome: RunOutcome::Completed,
            results,
            posts_analyzed: corpus.len(),
        })
    }

    /// One attempt: rate-limit, assemble the prompt, call the model,
    /// normalize the response.
    async fn attempt_task(
        &self,
        task: &TaskSpec,
        components: &TaskComponents,
        corpus_json: &str,
        store: &ResultStore,
    ) -> Result<String> {
        self.limiter.acquire().await;

        let prompt = assemble_prompt(task, components, corpus_json, store);
        let messages = [ChatMessage::user(prompt)];

        let envelope = self
            .llm
            .call(None, &messages)
            .await
            .map_err(|e| RedsiftError::Llm(e.to_string()))?;

        Ok(extract_text(&envelope))
    }
}

/// Build the final prompt text for one task.
///
/// Fixed concatenation order: role, task, context, protocol, the literal
/// format-match instruction, then either the corpus JSON or (terminal task
/// only) the prior-results summary.
fn assemble_prompt(
    task: &TaskSpec,
    components: &TaskComponents,
    corpus_json: &str,
    store: &ResultStore,
) -> String {
    let preamble = format!(
        "{role}\n\n\
         Task: {task}\n\
         Context: {context}\n\n\
         Analysis Protocol:\n{protocol}\n\n\
         You must format your response EXACTLY like this example:\n{output_format}\n\n\
         Do not deviate from this format or add any additional explanations.\n\n",
        role = components.role,
        task = components.task,
        context = components.context,
        protocol = components.protocol,
        output_format = components.output_format,
    );

    if task.depends_on_prior {
        format!(
            "{preamble}Previous analysis results to correlate:\n{}",
            format_previous_results(store)
        )
    } else {
        format!("{preamble}Data to analyze:\n{corpus_json}")
    }
}
