//! True/false game.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::sheet::{AnswerSheet, Recorded};
use super::{AnswerRecord, Applied, Explanation, Feedback, Mark, Submitted};
use crate::domain::TrueFalseItem;
use crate::error::GameError;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChoiceView {
  pub value: bool,
  pub mark: Mark,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TfItemView {
  pub number: usize,
  pub statement: String,
  /// Always `[true, false]`, in that order.
  pub choices: [ChoiceView; 2],
  pub answered: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub feedback: Option<Feedback>,
}

pub struct TrueFalseGame {
  items: Vec<TrueFalseItem>,
  answers: AnswerSheet<bool>,
}

impl TrueFalseGame {
  pub fn new(records: &[Value]) -> Self {
    let items: Vec<TrueFalseItem> = records.iter().map(TrueFalseItem::from_value).collect();
    let answers = AnswerSheet::new(items.len());
    Self { items, answers }
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn choose(&mut self, item: usize, value: bool) -> Result<Applied, GameError> {
    let correct = self
      .items
      .get(item)
      .map(|it| it.correct == value)
      .ok_or(GameError::ItemOutOfRange { index: item, len: self.items.len() })?;

    match self.answers.record(item, value)? {
      Recorded::First => Ok(Applied::answered(AnswerRecord {
        item,
        answer: Submitted::Bool(value),
        correct,
      })),
      Recorded::AlreadyAnswered => {
        debug!(target: "games", item, value, "True/false item already answered; ignoring");
        Ok(Applied::nothing())
      }
    }
  }

  pub fn view(&self, premium: bool) -> Vec<TfItemView> {
    self
      .items
      .iter()
      .enumerate()
      .map(|(i, it)| {
        let chosen = self.answers.get(i);
        let choice = |value: bool| {
          let mark = match chosen {
            None => Mark::Open,
            Some(_) if it.correct == value => Mark::Correct,
            Some(c) if c == value => Mark::Wrong,
            Some(_) => Mark::Dimmed,
          };
          ChoiceView { value, mark }
        };

        TfItemView {
          number: i + 1,
          statement: it.statement.clone(),
          choices: [choice(true), choice(false)],
          answered: chosen.is_some(),
          feedback: chosen.map(|c| Feedback {
            correct: c == it.correct,
            explanation: Explanation::gate(it.explanation.as_deref(), premium),
          }),
        }
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn game() -> TrueFalseGame {
    TrueFalseGame::new(&[
      json!({ "statement": "The sun is a star.", "is_correct": "YES", "explanation": "It is a G-type star." }),
      json!({ "statement": "Bats are birds.", "correct_answer": 0 }),
    ])
  }

  #[test]
  fn correctness_compares_with_normalized_bool() {
    let mut g = game();
    assert!(g.choose(0, true).unwrap().answer.unwrap().correct);
    assert!(!g.choose(1, true).unwrap().answer.unwrap().correct);
  }

  #[test]
  fn answered_item_marks_correct_and_wrong_choice() {
    let mut g = game();
    g.choose(1, true).unwrap();
    let view = &g.view(false)[1];
    assert_eq!(view.choices[0], ChoiceView { value: true, mark: Mark::Wrong });
    assert_eq!(view.choices[1], ChoiceView { value: false, mark: Mark::Correct });
    assert_eq!(view.feedback.as_ref().unwrap().explanation, Explanation::Locked);
  }

  #[test]
  fn correct_answer_dims_the_other_choice() {
    let mut g = game();
    g.choose(0, true).unwrap();
    let view = &g.view(true)[0];
    assert_eq!(view.choices[0].mark, Mark::Correct);
    assert_eq!(view.choices[1].mark, Mark::Dimmed);
    assert_eq!(
      view.feedback.as_ref().unwrap().explanation,
      Explanation::Shown { text: "It is a G-type star.".into() }
    );
  }

  #[test]
  fn first_answer_wins() {
    let mut g = game();
    g.choose(0, false).unwrap();
    assert_eq!(g.choose(0, true).unwrap(), Applied::nothing());
    let view = &g.view(true)[0];
    assert!(!view.feedback.as_ref().unwrap().correct);
    assert_eq!(view.choices[1].mark, Mark::Wrong);
  }

  #[test]
  fn unknown_item_is_an_error() {
    let mut g = game();
    assert!(matches!(g.choose(2, true), Err(GameError::ItemOutOfRange { index: 2, len: 2 })));
  }
}
