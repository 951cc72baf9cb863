//! Multiple-choice game.

use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::sheet::AnswerSheet;
use super::{AnswerRecord, Applied, Explanation, Feedback, Mark, Submitted};
use crate::domain::McqItem;
use crate::error::GameError;
use crate::shuffle::{prepare_mcq, ShuffledMcq};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct OptionView {
  pub text: String,
  pub mark: Mark,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct McqItemView {
  /// 1-based.
  pub number: usize,
  pub question: String,
  pub options: Vec<OptionView>,
  pub answered: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub feedback: Option<Feedback>,
}

pub struct McqGame {
  items: Vec<ShuffledMcq>,
  answers: AnswerSheet<usize>,
}

impl McqGame {
  /// Options are shuffled once, here; views never reshuffle.
  pub fn new<R: Rng + ?Sized>(records: &[Value], rng: &mut R) -> Self {
    let items: Vec<ShuffledMcq> = records
      .iter()
      .map(|r| prepare_mcq(&McqItem::from_value(r), rng))
      .collect();
    let answers = AnswerSheet::new(items.len());
    Self { items, answers }
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn select(&mut self, item: usize, option: usize) -> Result<Applied, GameError> {
    let len = self.items.len();
    let q = self.items.get(item).ok_or(GameError::ItemOutOfRange { index: item, len })?;
    // A locked item ignores every further select, in range or not.
    if self.answers.get(item).is_some() {
      debug!(target: "games", item, option, "MCQ item already answered; ignoring");
      return Ok(Applied::nothing());
    }
    if option >= q.options.len() {
      return Err(GameError::OptionOutOfRange { item, option, len: q.options.len() });
    }
    let correct = q.correct_index == Some(option);

    self.answers.record(item, option)?;
    Ok(Applied::answered(AnswerRecord { item, answer: Submitted::Option(option), correct }))
  }

  pub fn view(&self, premium: bool) -> Vec<McqItemView> {
    self
      .items
      .iter()
      .enumerate()
      .map(|(i, q)| {
        let chosen = self.answers.get(i);
        let options = q
          .options
          .iter()
          .enumerate()
          .map(|(j, text)| {
            let mark = match chosen {
              None => Mark::Open,
              Some(_) if q.correct_index == Some(j) => Mark::Correct,
              Some(c) if c == j => Mark::Wrong,
              Some(_) => Mark::Dimmed,
            };
            OptionView { text: text.clone(), mark }
          })
          .collect();
        let feedback = chosen.map(|c| Feedback {
          correct: q.correct_index == Some(c),
          explanation: Explanation::gate(q.explanation.as_deref(), premium),
        });

        McqItemView {
          number: i + 1,
          question: q.question.clone(),
          options,
          answered: chosen.is_some(),
          feedback,
        }
      })
      .collect()
  }
}
