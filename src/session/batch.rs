use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crate::assets::decode::SourceImage;
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::output::gate::PublishGate;
use crate::render::badge::BadgeStyle;
use crate::session::generator::{BadgeGenerator, GenerationFailure, GenerationResult};

/// Per-label outcome of a batch.
pub type LabelOutcome = Result<GenerationResult, GenerationFailure>;

/// Scheduling options for [`BadgeGenerator::generate_badge_batch`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOpts {
    /// Process labels concurrently on a dedicated rayon pool.
    pub parallel: bool,
    /// Worker threads when `parallel` is set. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Deadline for the whole batch call. Unfinished labels fail with a timeout.
    pub timeout: Option<Duration>,
}

impl BatchOpts {
    /// Reject option combinations that cannot be scheduled.
    pub fn validate(&self) -> BadgeResult<()> {
        if self.threads == Some(0) {
            return Err(BadgeError::validation(
                "batch 'threads' must be >= 1 when set",
            ));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(BadgeError::validation(
                "batch 'timeout' must be > 0 when set",
            ));
        }
        Ok(())
    }
}

/// Ordered outcomes of a batch call: exactly one entry per requested label, in request order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct BatchOutcome {
    outcomes: Vec<LabelOutcome>,
}

impl BatchOutcome {
    /// Number of outcomes (equals the number of requested labels).
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Return `true` for an empty batch.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcomes in request order.
    pub fn outcomes(&self) -> &[LabelOutcome] {
        &self.outcomes
    }

    /// Consume into the outcome list.
    pub fn into_outcomes(self) -> Vec<LabelOutcome> {
        self.outcomes
    }

    /// Iterate outcomes in request order.
    pub fn iter(&self) -> std::slice::Iter<'_, LabelOutcome> {
        self.outcomes.iter()
    }

    /// Successful results, in request order.
    pub fn successes(&self) -> impl Iterator<Item = &GenerationResult> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    /// Failures, in request order.
    pub fn failures(&self) -> impl Iterator<Item = &GenerationFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    /// Number of failed labels.
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    fn uniform_failure(labels: &[String], err: &BadgeError) -> Self {
        let reason = match err {
            BadgeError::Decode(m) | BadgeError::Timeout(m) => m.clone(),
            other => format!("{other:#}"),
        };
        let outcomes = labels
            .iter()
            .map(|label| {
                let err = match err {
                    BadgeError::Decode(_) => BadgeError::decode(reason.clone()),
                    BadgeError::Timeout(_) => BadgeError::timeout(reason.clone()),
                    _ => BadgeError::Other(anyhow::anyhow!(reason.clone())),
                };
                Err(GenerationFailure::from_error(label, &err.for_label(label)))
            })
            .collect();
        Self { outcomes }
    }
}

impl<'a> IntoIterator for &'a BatchOutcome {
    type Item = &'a LabelOutcome;
    type IntoIter = std::slice::Iter<'a, LabelOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

impl BadgeGenerator {
    /// Badge the same image once per label.
    ///
    /// The source is decoded once and shared read-only by every label. A label that fails at
    /// any stage is recorded as a [`GenerationFailure`] and the batch moves on; the returned
    /// outcome always has one entry per label, in input order. A source that cannot be decoded
    /// fails every label with the same decode error before any per-label work starts.
    ///
    /// With a configured timeout the call returns at the deadline, counted from entry and
    /// including the decode. Labels still running are reported as timeouts and never publish
    /// their artifact.
    #[tracing::instrument(skip_all, fields(labels = labels.len(), bytes = image_bytes.len()))]
    pub fn generate_badge_batch<S: AsRef<str>>(
        &self,
        image_bytes: &[u8],
        labels: &[S],
        style: Option<&BadgeStyle>,
    ) -> BatchOutcome {
        let deadline = self.batch.timeout.map(|t| Instant::now() + t);
        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_owned()).collect();
        if labels.is_empty() {
            return BatchOutcome::default();
        }
        let style = style
            .map(|s| Arc::new(s.clone()))
            .unwrap_or_else(|| Arc::clone(&self.style));

        let outcome = if !self.batch.parallel && deadline.is_none() {
            self.run_inline(image_bytes, &labels, &style)
        } else {
            self.run_on_pool(image_bytes, &labels, &style, deadline)
        };

        for failure in outcome.failures() {
            tracing::warn!(kind = ?failure.kind, "{}", failure.error);
        }
        tracing::info!(
            succeeded = outcome.len() - outcome.failure_count(),
            failed = outcome.failure_count(),
            "batch finished"
        );
        outcome
    }

    fn run_inline(
        &self,
        image_bytes: &[u8],
        labels: &[String],
        style: &BadgeStyle,
    ) -> BatchOutcome {
        let source = match SourceImage::decode(image_bytes) {
            Ok(source) => source,
            Err(e) => return source_failure(labels, &e),
        };
        let outcomes = labels
            .iter()
            .map(|label| {
                run_guarded(self, &source, label, style, &PublishGate::new())
                    .map_err(|e| GenerationFailure::from_error(label, &e))
            })
            .collect();
        BatchOutcome { outcomes }
    }

    fn run_on_pool(
        &self,
        image_bytes: &[u8],
        labels: &[String],
        style: &Arc<BadgeStyle>,
        deadline: Option<Instant>,
    ) -> BatchOutcome {
        let threads = if self.batch.parallel {
            self.batch.threads
        } else {
            Some(1)
        };
        let pool = match build_thread_pool(threads) {
            Ok(pool) => pool,
            Err(e) => return BatchOutcome::uniform_failure(labels, &e),
        };
        let source = match decode_within(&pool, image_bytes, deadline) {
            Ok(source) => source,
            Err(e) => return source_failure(labels, &e),
        };

        let (tx, rx) = mpsc::channel::<(usize, BadgeResult<GenerationResult>)>();
        let gates: Vec<Arc<PublishGate>> = labels.iter().map(|_| Arc::default()).collect();
        for (idx, (label, gate)) in labels.iter().zip(&gates).enumerate() {
            let tx = tx.clone();
            let generator = self.clone();
            let source = source.clone();
            let style = Arc::clone(style);
            let gate = Arc::clone(gate);
            let label = label.clone();
            pool.spawn(move || {
                let res = if gate.is_closed() {
                    Err(BadgeError::timeout("batch deadline elapsed before the label started")
                        .for_label(&label))
                } else {
                    run_guarded(&generator, &source, &label, &style, &gate)
                };
                // The receiver is gone once the batch has returned.
                let _ = tx.send((idx, res));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<LabelOutcome>> = (0..labels.len()).map(|_| None).collect();
        let mut pending = labels.len();
        let mut timed_out = false;
        while pending > 0 {
            let msg = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        timed_out = true;
                        break;
                    }
                    match rx.recv_timeout(left) {
                        Ok(msg) => msg,
                        Err(mpsc::RecvTimeoutError::Timeout) => {
                            timed_out = true;
                            break;
                        }
                        Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match rx.recv() {
                    Ok(msg) => msg,
                    Err(_) => break,
                },
            };
            fill_slot(&mut slots, labels, msg);
            pending -= 1;
        }

        // Close every unreported label. A label whose artifact is already published keeps its
        // result; its report is only a send away.
        let mut committed: Vec<usize> = slots
            .iter()
            .zip(&gates)
            .enumerate()
            .filter(|(_, (slot, gate))| slot.is_none() && !gate.close())
            .map(|(idx, _)| idx)
            .collect();
        while let Ok(msg) = rx.try_recv() {
            fill_slot(&mut slots, labels, msg);
        }
        committed.retain(|&idx| slots[idx].is_none());
        while !committed.is_empty() {
            let Ok(msg) = rx.recv() else { break };
            fill_slot(&mut slots, labels, msg);
            committed.retain(|&idx| slots[idx].is_none());
        }

        let timeout = self.batch.timeout;
        let outcomes = slots
            .into_iter()
            .zip(labels)
            .map(|(slot, label)| {
                slot.unwrap_or_else(|| {
                    let err = if timed_out {
                        BadgeError::timeout(format!(
                            "batch deadline of {}ms elapsed before the label completed",
                            timeout.map_or(0, |t| t.as_millis())
                        ))
                    } else {
                        BadgeError::Other(anyhow::anyhow!(
                            "worker exited without reporting a result"
                        ))
                    };
                    Err(GenerationFailure::from_error(label, &err.for_label(label)))
                })
            })
            .collect();
        BatchOutcome { outcomes }
    }
}

fn fill_slot(
    slots: &mut [Option<LabelOutcome>],
    labels: &[String],
    (idx, res): (usize, BadgeResult<GenerationResult>),
) {
    if slots[idx].is_none() {
        slots[idx] = Some(res.map_err(|e| GenerationFailure::from_error(&labels[idx], &e)));
    }
}

fn source_failure(labels: &[String], err: &BadgeError) -> BatchOutcome {
    tracing::warn!(error = %err, "source image unavailable; failing every label");
    BatchOutcome::uniform_failure(labels, err)
}

/// Decode on `pool` so the caller stops waiting at `deadline`.
fn decode_within(
    pool: &rayon::ThreadPool,
    image_bytes: &[u8],
    deadline: Option<Instant>,
) -> BadgeResult<SourceImage> {
    let Some(deadline) = deadline else {
        return SourceImage::decode(image_bytes);
    };

    let (tx, rx) = mpsc::channel();
    let bytes = image_bytes.to_vec();
    pool.spawn(move || {
        let _ = tx.send(SourceImage::decode(&bytes));
    });
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(res) => res,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(BadgeError::timeout(
            "batch deadline elapsed while decoding the source",
        )),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(BadgeError::Other(anyhow::anyhow!(
            "decode worker exited without reporting a result"
        ))),
    }
}

/// Run one label, turning a panic into a failure of that label.
fn run_guarded(
    generator: &BadgeGenerator,
    source: &SourceImage,
    label: &str,
    style: &BadgeStyle,
    gate: &PublishGate,
) -> BadgeResult<GenerationResult> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        generator.run_label(source, label, style, gate)
    }))
    .unwrap_or_else(|payload| {
        let msg = panic_message(payload.as_ref());
        tracing::error!(label, panic = %msg, "badge worker panicked");
        Err(BadgeError::Other(anyhow::anyhow!("worker panicked: {msg}")).for_label(label))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}

fn build_thread_pool(threads: Option<usize>) -> BadgeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(BadgeError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new()
        .thread_name(|i| format!("badgeforge-worker-{i}"))
        .panic_handler(|payload| {
            tracing::error!(panic = %panic_message(payload.as_ref()), "badge worker panicked");
        });
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BadgeError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/batch.rs"]
mod tests;
