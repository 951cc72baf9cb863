//! Flashcard deck: one card at a time, flip to see the back, wrap-around navigation.
//!
//! Navigating is split in two. [`FlashcardGame::begin`] turns the card face
//! down right away; [`FlashcardGame::settle`] moves the index once the flip-back
//! animation has had time to run. Each settle is a relative move, so two quick
//! "next" presses advance two cards.

use serde::Serialize;
use serde_json::Value;

use super::Applied;
use crate::domain::FlashcardItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
  Forward,
  Backward,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CardView {
  /// 1-based position in the deck.
  pub position: usize,
  pub total: usize,
  pub front: Option<String>,
  pub back: Option<String>,
  pub flipped: bool,
}

pub struct FlashcardGame {
  cards: Vec<FlashcardItem>,
  index: usize,
  flipped: bool,
}

/// Circular neighbour of `index` in a deck of `len` cards.
pub fn wrap(index: usize, len: usize, step: Step) -> usize {
  if len == 0 {
    return 0;
  }
  match step {
    Step::Forward => (index + 1) % len,
    Step::Backward => (index + len - 1) % len,
  }
}

impl FlashcardGame {
  pub fn new(records: &[Value]) -> Self {
    Self { cards: records.iter().map(FlashcardItem::from_value).collect(), index: 0, flipped: false }
  }

  pub fn len(&self) -> usize {
    self.cards.len()
  }

  pub fn flip(&mut self) -> Applied {
    self.flipped = !self.flipped;
    Applied::nothing()
  }

  /// Face the card down; the caller settles `step` after the flip-back delay.
  pub fn begin(&mut self, step: Step) -> Applied {
    self.flipped = false;
    Applied::later(step)
  }

  pub fn settle(&mut self, step: Step) {
    self.index = wrap(self.index, self.cards.len(), step);
  }

  pub fn view(&self) -> Option<CardView> {
    let card = self.cards.get(self.index)?;
    Some(CardView {
      position: self.index + 1,
      total: self.cards.len(),
      front: card.front.clone(),
      back: card.back.clone(),
      flipped: self.flipped,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn deck(n: usize) -> FlashcardGame {
    let records: Vec<Value> =
      (0..n).map(|i| json!({ "front": format!("term {i}"), "back": format!("def {i}") })).collect();
    FlashcardGame::new(&records)
  }

  #[test]
  fn wraparound_in_both_directions() {
    assert_eq!(wrap(2, 3, Step::Forward), 0);
    assert_eq!(wrap(0, 3, Step::Backward), 2);
    assert_eq!(wrap(1, 3, Step::Forward), 2);
    assert_eq!(wrap(0, 1, Step::Backward), 0);
    assert_eq!(wrap(0, 0, Step::Forward), 0);
  }

  #[test]
  fn navigation_flips_back_before_moving() {
    let mut g = deck(3);
    g.flip();
    assert!(g.view().unwrap().flipped);

    let applied = g.begin(Step::Forward);
    assert_eq!(applied.deferred, Some(Step::Forward));
    let view = g.view().unwrap();
    assert!(!view.flipped);
    assert_eq!(view.position, 1, "index only changes on settle");

    g.settle(Step::Forward);
    assert_eq!(g.view().unwrap().position, 2);
  }

  #[test]
  fn last_card_next_goes_to_first_and_back() {
    let mut g = deck(3);
    g.settle(Step::Backward);
    assert_eq!(g.view().unwrap().position, 3);
    g.settle(Step::Forward);
    let view = g.view().unwrap();
    assert_eq!(view.position, 1);
    assert_eq!(view.front.as_deref(), Some("term 0"));
  }

  #[test]
  fn repeated_moves_accumulate() {
    let mut g = deck(4);
    g.begin(Step::Forward);
    g.begin(Step::Forward);
    g.settle(Step::Forward);
    g.settle(Step::Forward);
    assert_eq!(g.view().unwrap().position, 3);
  }

  #[test]
  fn flip_toggles() {
    let mut g = deck(1);
    g.flip();
    g.flip();
    assert!(!g.view().unwrap().flipped);
  }

  #[test]
  fn missing_sides_render_as_absent() {
    let g = FlashcardGame::new(&[json!({ "front": "only front" })]);
    let view = g.view().unwrap();
    assert_eq!(view.back, None);
    assert_eq!(view.total, 1);
  }

  #[test]
  fn empty_deck_has_no_card() {
    let mut g = FlashcardGame::new(&[]);
    g.settle(Step::Forward);
    assert_eq!(g.view(), None);
  }
}
