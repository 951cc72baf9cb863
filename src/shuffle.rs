//! MCQ option shuffling with correct-index re-derivation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::answer::resolve_correct_content;
use crate::domain::McqItem;

/// An MCQ item ready to play: options in display order, correct index resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffledMcq {
  pub question: String,
  pub options: Vec<String>,
  /// Always `< options.len()`; `None` only when there are no options at all.
  pub correct_index: Option<usize>,
  pub explanation: Option<String>,
}

/// Resolve the correct content, then shuffle.
pub fn prepare_mcq<R: Rng + ?Sized>(item: &McqItem, rng: &mut R) -> ShuffledMcq {
  let content = resolve_correct_content(item.correct_answer.as_ref(), &item.options);
  shuffle_options(item, content, rng)
}

/// Permute options uniformly and locate `correct_content` in the new order.
///
/// When the content is unknown or cannot be found after the shuffle, a uniformly
/// random index is used so a failed resolution does not always point at the first slot.
pub fn shuffle_options<R: Rng + ?Sized>(
  item: &McqItem,
  correct_content: Option<&str>,
  rng: &mut R,
) -> ShuffledMcq {
  let mut options = item.options.clone();
  options.shuffle(rng);

  let located = correct_content.and_then(|c| options.iter().position(|o| o == c));
  let correct_index = match located {
    Some(i) => Some(i),
    None if options.is_empty() => None,
    None => Some(rng.gen_range(0..options.len())),
  };

  ShuffledMcq {
    question: item.question.clone(),
    options,
    correct_index,
    explanation: item.explanation.clone(),
  }
}
