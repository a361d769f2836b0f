//! Greedy and beam search over a step function that scores next tokens.
//!
//! The step function receives the live sequences and returns a
//! `(sequences, vocab)` tensor of logits. Keeping the model behind a closure
//! lets the search be driven by scripted scores in tests.

use candle_core::{DType, Tensor, D};
use candle_transformers::generation::{LogitsProcessor, Sampling};
use candle_transformers::utils::apply_repeat_penalty;

use crate::error::{AdaptError, Result};
use crate::generation::GenerationRequest;

/// Passthrough options the search understands
pub(crate) const KNOWN_EXTRAS: [&str; 2] = ["length_penalty", "repetition_penalty"];

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchParams {
    pub num_beams: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub early_stopping: bool,
    pub length_penalty: f64,
    pub repetition_penalty: f64,
    pub start_token: u32,
    pub eos_token: u32,
}

impl SearchParams {
    /// Checks `request` and reads its recognised extras.
    pub(crate) fn from_request(request: &GenerationRequest, start_token: u32, eos_token: u32) -> Result<Self> {
        request.validate()?;
        request.ensure_known_extras(&KNOWN_EXTRAS)?;

        let repetition_penalty = request.extra_f64("repetition_penalty", 1.0)?;
        if repetition_penalty <= 0.0 {
            return Err(AdaptError::generation(anyhow::anyhow!(
                "`repetition_penalty` must be positive, got {}", repetition_penalty
            )));
        }

        Ok(Self {
            num_beams: request.num_beams,
            min_length: request.min_length,
            max_length: request.max_length,
            early_stopping: request.early_stopping,
            length_penalty: request.extra_f64("length_penalty", 1.0)?,
            repetition_penalty,
            start_token,
            eos_token,
        })
    }

    /// Applies the repetition penalty and blocks EOS below `min_length`.
    ///
    /// Sequences here include the start token, as do the length bounds.
    fn adjust_logits(&self, logits: &Tensor, tokens: &[u32]) -> candle_core::Result<Tensor> {
        let logits = logits.to_dtype(DType::F32)?;
        let logits = if self.repetition_penalty != 1.0 {
            apply_repeat_penalty(&logits, self.repetition_penalty as f32, tokens)?
        } else {
            logits
        };

        let eos = self.eos_token as usize;
        if tokens.len() < self.min_length && eos < logits.dim(0)? {
            let blocked = Tensor::new(&[f32::NEG_INFINITY], logits.device())?;
            return logits.slice_assign(&[eos..eos + 1], &blocked);
        }
        Ok(logits)
    }

    fn normalize(&self, score: f64, len: usize) -> f64 {
        score / (len as f64).powf(self.length_penalty)
    }
}

/// Splits a `(sequences, vocab)` step output into one tensor per sequence.
fn step_rows(logits: Tensor, expected: usize) -> Result<Vec<Tensor>> {
    let (rows, _vocab) = logits.dims2().map_err(AdaptError::generation)?;
    if rows != expected {
        return Err(AdaptError::generation(anyhow::anyhow!(
            "step returned {} rows for {} sequences", rows, expected
        )));
    }
    (0..rows).map(|row| logits.get(row).map_err(AdaptError::generation)).collect()
}

/// Picks the most likely token at every step.
pub(crate) fn greedy<F>(params: &SearchParams, mut step: F) -> Result<Vec<u32>>
where F: FnMut(&[Vec<u32>]) -> Result<Tensor>
{
    let mut processor = LogitsProcessor::from_sampling(0, Sampling::ArgMax);
    let mut tokens = vec![params.start_token];
    while tokens.len() < params.max_length {
        let logits = step_rows(step(std::slice::from_ref(&tokens))?, 1)?;
        let next = params
            .adjust_logits(&logits[0], &tokens)
            .and_then(|logits| processor.sample(&logits))
            .map_err(AdaptError::generation)?;

        tokens.push(next);
        if next == params.eos_token {
            break;
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone)]
struct Hypothesis {
    tokens: Vec<u32>,
    score: f64,
}

/// Keeps the `num_beams` best partial sequences at every step.
///
/// Finished hypotheses are ranked by `score / len^length_penalty`. With
/// `early_stopping` the search ends as soon as `num_beams` hypotheses have
/// finished; otherwise it continues until no live beam can beat the worst
/// finished one.
pub(crate) fn beam_search<F>(params: &SearchParams, mut step: F) -> Result<Vec<u32>>
where F: FnMut(&[Vec<u32>]) -> Result<Tensor>
{
    let num_beams = params.num_beams;
    let mut live = vec![Hypothesis { tokens: vec![params.start_token], score: 0.0 }];
    let mut finished: Vec<Hypothesis> = Vec::new();

    loop {
        let len = match live.first() {
            Some(best) => best.tokens.len(),
            None => break,
        };
        if len >= params.max_length {
            break;
        }

        let sequences: Vec<Vec<u32>> = live.iter().map(|h| h.tokens.clone()).collect();
        let rows = step_rows(step(&sequences)?, live.len())?;

        let mut candidates: Vec<(f64, usize, u32)> = Vec::new();
        for (beam, (hyp, logits)) in live.iter().zip(rows).enumerate() {
            let log_probs = params
                .adjust_logits(&logits, &hyp.tokens)
                .and_then(|logits| candle_nn::ops::log_softmax(&logits, D::Minus1))
                .and_then(|log_probs| log_probs.to_vec1::<f32>())
                .map_err(AdaptError::generation)?;
            let mut ranked: Vec<(u32, f64)> = log_probs
                .into_iter()
                .enumerate()
                .map(|(token, lp)| (token as u32, lp as f64))
                .collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            ranked.truncate(2 * num_beams);
            candidates.extend(ranked.into_iter().map(|(token, lp)| (hyp.score + lp, beam, token)));
        }
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut next = Vec::with_capacity(num_beams);
        for (rank, (score, beam, token)) in candidates.into_iter().enumerate() {
            if score == f64::NEG_INFINITY {
                break;
            }
            let mut tokens = live[beam].tokens.clone();
            tokens.push(token);

            if token == params.eos_token {
                if rank < num_beams {
                    let score = params.normalize(score, tokens.len());
                    finished.push(Hypothesis { tokens, score });
                }
            } else {
                next.push(Hypothesis { tokens, score });
                if next.len() == num_beams {
                    break;
                }
            }
        }

        finished.sort_by(|a, b| b.score.total_cmp(&a.score));
        finished.truncate(num_beams);
        live = next;

        if finished.len() >= num_beams {
            if params.early_stopping {
                break;
            }
            let worst_finished = finished[num_beams - 1].score;
            let best_live = live
                .first()
                .map(|h| params.normalize(h.score, h.tokens.len()))
                .unwrap_or(f64::NEG_INFINITY);
            if best_live <= worst_finished {
                break;
            }
        }
    }

    // Beams cut off by max_length compete with the finished ones
    finished.extend(live.into_iter().map(|h| Hypothesis {
        score: params.normalize(h.score, h.tokens.len()),
        tokens: h.tokens,
    }));

    finished
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|h| h.tokens)
        .ok_or_else(|| AdaptError::generation(anyhow::anyhow!("beam search produced no hypothesis")))
}
