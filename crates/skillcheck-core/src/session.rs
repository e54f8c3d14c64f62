//! Interview session bookkeeping.
//!
//! An [`InterviewSession`] owns the ordered list of response records. It is
//! the input boundary of the engine: answers are validated here before the
//! evaluator sees them, and a record is only appended once its evaluation
//! has completed.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::error::InputError;
use crate::evaluator::ResponseEvaluator;
use crate::model::{is_skip_answer, validate_answer, validate_question, Question, SKIP_SENTINEL};
use crate::report::AssessmentReport;
use crate::results::ResponseRecord;

/// Progress reporting trait.
pub trait SessionProgress: Send + Sync {
    fn on_answer_start(&self, index: usize, question: &Question);
    fn on_answer_complete(&self, index: usize, record: &ResponseRecord);
    fn on_answer_rejected(&self, index: usize, question: &Question, error: &InputError);
    fn on_session_complete(&self, answered: usize, rejected: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopProgress;

impl SessionProgress for NoopProgress {
    fn on_answer_start(&self, _: usize, _: &Question) {}
    fn on_answer_complete(&self, _: usize, _: &ResponseRecord) {}
    fn on_answer_rejected(&self, _: usize, _: &Question, _: &InputError) {}
    fn on_session_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// A scripted answer: the question and what the candidate said.
///
/// `answer: None` is an explicit skip.
#[derive(Debug, Clone)]
pub struct ScriptedAnswer {
    pub question: Question,
    pub answer: Option<String>,
}

/// One interview, from first question to final report.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    records: Vec<ResponseRecord>,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate, evaluate, and record one answer.
    ///
    /// The "I don't know" sentinel is recorded as a skip.
    pub async fn answer(
        &mut self,
        evaluator: &ResponseEvaluator,
        question: &Question,
        answer: &str,
    ) -> Result<&ResponseRecord, InputError> {
        validate_question(question)?;
        if is_skip_answer(answer) {
            return self.skip_with_answer(evaluator, question, answer);
        }
        validate_answer(question, answer)?;

        let evaluation = evaluator.evaluate(question, answer).await;
        Ok(self.push(ResponseRecord::new(question.clone(), answer, evaluation)))
    }

    /// Record an explicit skip.
    pub fn skip(
        &mut self,
        evaluator: &ResponseEvaluator,
        question: &Question,
    ) -> Result<&ResponseRecord, InputError> {
        validate_question(question)?;
        self.skip_with_answer(evaluator, question, SKIP_SENTINEL)
    }

    fn skip_with_answer(
        &mut self,
        evaluator: &ResponseEvaluator,
        question: &Question,
        answer: &str,
    ) -> Result<&ResponseRecord, InputError> {
        let evaluation = evaluator.skip(question);
        Ok(self.push(ResponseRecord::skipped(question.clone(), answer, evaluation)))
    }

    fn push(&mut self, record: ResponseRecord) -> &ResponseRecord {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Discard all answers and start over with a fresh session ID.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Close the session and build its report.
    pub fn finish(self) -> AssessmentReport {
        AssessmentReport::new(self.id, self.started_at, Utc::now(), self.records)
    }

    /// Play a scripted list of answers through the evaluator.
    ///
    /// Every item is validated first; answers that violate the input
    /// contract are reported and left out of the session, they never abort
    /// the run. Accepted answers are evaluated concurrently, bounded by the
    /// evaluator's `parallelism`, and recorded in script order.
    pub async fn run_answers(
        &mut self,
        evaluator: &ResponseEvaluator,
        script: &[ScriptedAnswer],
        progress: &dyn SessionProgress,
    ) {
        let start = Instant::now();
        let mut accepted = Vec::with_capacity(script.len());

        for (index, item) in script.iter().enumerate() {
            progress.on_answer_start(index, &item.question);
            match check_scripted(item) {
                Ok(()) => accepted.push((index, item)),
                Err(e) => {
                    tracing::warn!(question = %item.question.id, "rejected answer: {e}");
                    progress.on_answer_rejected(index, &item.question, &e);
                }
            }
        }

        let records: Vec<ResponseRecord> = stream::iter(&accepted)
            .map(|(_, item)| scripted_record(evaluator, item))
            .buffered(evaluator.config().parallelism.max(1))
            .collect()
            .await;

        let answered = records.len();
        for ((index, _), record) in accepted.iter().zip(records) {
            let record = self.push(record);
            progress.on_answer_complete(*index, record);
        }

        progress.on_session_complete(answered, script.len() - answered, start.elapsed());
    }
}

fn check_scripted(item: &ScriptedAnswer) -> Result<(), InputError> {
    validate_question(&item.question)?;
    match &item.answer {
        Some(text) if !is_skip_answer(text) => validate_answer(&item.question, text),
        _ => Ok(()),
    }
}

async fn scripted_record(evaluator: &ResponseEvaluator, item: &ScriptedAnswer) -> ResponseRecord {
    let question = &item.question;
    match &item.answer {
        Some(text) if !is_skip_answer(text) => {
            let evaluation = evaluator.evaluate(question, text).await;
            ResponseRecord::new(question.clone(), text.as_str(), evaluation)
        }
        Some(text) => ResponseRecord::skipped(question.clone(), text.as_str(), evaluator.skip(question)),
        None => ResponseRecord::skipped(question.clone(), SKIP_SENTINEL, evaluator.skip(question)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use std::sync::Mutex;

    fn question(id: &str, keywords: &[&str]) -> Question {
        Question {
            id: id.into(),
            text: format!("Explain {id}?"),
            difficulty: Difficulty::Intermediate,
            expected_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            follow_up: None,
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl SessionProgress for RecordingProgress {
        fn on_answer_start(&self, index: usize, _: &Question) {
            self.events.lock().unwrap().push(format!("start {index}"));
        }
        fn on_answer_complete(&self, index: usize, _: &ResponseRecord) {
            self.events.lock().unwrap().push(format!("done {index}"));
        }
        fn on_answer_rejected(&self, index: usize, _: &Question, _: &InputError) {
            self.events.lock().unwrap().push(format!("rejected {index}"));
        }
        fn on_session_complete(&self, answered: usize, rejected: usize, _: Duration) {
            self.events
                .lock()
                .unwrap()
                .push(format!("complete {answered}/{rejected}"));
        }
    }

    #[tokio::test]
    async fn answer_appends_one_record() {
        let evaluator = ResponseEvaluator::keyword_only();
        let mut session = InterviewSession::new();
        let q = question("iferror", &["error", "handle"]);

        let record = session
            .answer(&evaluator, &q, "IFERROR lets you handle an error")
            .await
            .unwrap();
        assert_eq!(record.evaluation.score, 85.0);
        assert!(!record.skipped);
        assert_eq!(session.len(), 1);
    }

    #[tokio::test]
    async fn sentinel_answer_is_recorded_as_skip() {
        let evaluator = ResponseEvaluator::keyword_only();
        let mut session = InterviewSession::new();
        let q = question("pivot", &["summarize", "filter"]);

        let record = session.answer(&evaluator, &q, "I don't know").await.unwrap();
        assert!(record.skipped);
        assert_eq!(record.evaluation.score, 0.0);
        assert_eq!(record.evaluation.keywords_missing, q.expected_keywords);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_evaluation() {
        let evaluator = ResponseEvaluator::keyword_only();
        let mut session = InterviewSession::new();

        let err = session
            .answer(&evaluator, &question("q", &["a"]), "   ")
            .await
            .unwrap_err();
        assert_eq!(err, InputError::EmptyAnswer("q".into()));

        let mut bad = question("bad", &["a"]);
        bad.text = String::new();
        assert!(session.answer(&evaluator, &bad, "a").await.is_err());
        assert!(session.skip(&evaluator, &bad).is_err());

        assert!(session.is_empty(), "rejected input must not be recorded");
    }

    #[tokio::test]
    async fn reset_discards_records() {
        let evaluator = ResponseEvaluator::keyword_only();
        let mut session = InterviewSession::new();
        let first_id = session.id();
        session.skip(&evaluator, &question("q", &["a"])).unwrap();

        session.reset();
        assert!(session.is_empty());
        assert_ne!(session.id(), first_id);
    }

    #[tokio::test]
    async fn run_answers_reports_progress_and_skips_bad_input() {
        let evaluator = ResponseEvaluator::keyword_only();
        let mut session = InterviewSession::new();
        let progress = RecordingProgress::default();
        let script = vec![
            ScriptedAnswer {
                question: question("a", &["alpha"]),
                answer: Some("alpha".into()),
            },
            ScriptedAnswer {
                question: question("b", &["beta"]),
                answer: Some(String::new()),
            },
            ScriptedAnswer {
                question: question("c", &["gamma"]),
                answer: None,
            },
        ];

        session.run_answers(&evaluator, &script, &progress).await;

        assert_eq!(session.len(), 2);
        assert!(session.records()[1].skipped);
        let events = progress.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "start 0",
                "start 1",
                "rejected 1",
                "start 2",
                "done 0",
                "done 2",
                "complete 2/1",
            ]
        );
    }

    #[tokio::test]
    async fn finish_builds_report_from_records() {
        let evaluator = ResponseEvaluator::keyword_only();
        let mut session = InterviewSession::new();
        let id = session.id();
        session
            .answer(&evaluator, &question("a", &["alpha", "beta"]), "alpha")
            .await
            .unwrap();

        let report = session.finish();
        assert_eq!(report.id, id);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.summary.overall_score, 42.5);
        assert!(report.finished_at >= report.started_at);
    }
}
