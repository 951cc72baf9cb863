//! HTML fragment rendering of game views.
//!
//! The fragments carry semantic classes only (`choice correct`, `blank wrong`, ...);
//! styling is left to the static frontend. Interactive elements carry
//! `data-action` attributes so a thin script can post them back as actions.
//! Views are flattened into small row structs first so the templates stay
//! free of game logic.

use askama::Template;

use crate::config::UiConfig;
use crate::domain::GameMode;
use crate::games::{
  BlankItemView, BlankStatus, CardView, Explanation, Feedback, GameView, Mark, McqItemView, QaItemView, TfItemView,
};

/// An explanation as drawn: its text, or the upgrade placeholder when locked.
struct Note {
  locked: bool,
  text: String,
}

impl Note {
  fn from_explanation(explanation: &Explanation, ui: &UiConfig) -> Option<Self> {
    match explanation {
      Explanation::Shown { text } => Some(Note { locked: false, text: text.clone() }),
      Explanation::Locked => Some(Note { locked: true, text: ui.upgrade_text.clone() }),
      Explanation::Missing => None,
    }
  }
}

struct Choice {
  label: String,
  class: &'static str,
  value: String,
}

struct Verdict {
  class: &'static str,
  text: String,
  note: Option<Note>,
}

struct ChoiceItem {
  index: usize,
  number: usize,
  prompt: String,
  choices: Vec<Choice>,
  answered: bool,
  verdict: Option<Verdict>,
}

struct BlankRow {
  index: usize,
  before: String,
  after: String,
  draft: String,
  status: &'static str,
  locked: bool,
  can_check: bool,
  verdict: Option<Verdict>,
  note: Option<Note>,
}

struct QaRow {
  index: usize,
  number: usize,
  question: String,
  revealed: bool,
  suggested_answer: Option<String>,
  key_points: Vec<String>,
  note: Option<Note>,
}

#[derive(Template)]
#[template(source = r#"<div class="data-error" data-mode="{{ mode }}">{{ message }}</div>"#, ext = "html")]
struct DataErrorTemplate<'a> {
  mode: GameMode,
  message: &'a str,
}

/// Multiple choice and true/false share one layout; only the action differs.
#[derive(Template)]
#[template(
  source = r#"<div class="game {{ game_class }}">
{%- for item in items %}
<section class="item" data-item="{{ item.index }}"><h3><span class="number">Question {{ item.number }}:</span> {{ item.prompt }}</h3><div class="choices">
{%- for choice in item.choices %}<button class="choice {{ choice.class }}" data-action="{{ action }}" data-{{ field }}="{{ choice.value }}"{% if item.answered %} disabled{% endif %}>{{ choice.label }}</button>{% endfor -%}
</div>
{%- if let Some(verdict) = item.verdict %}<div class="feedback {{ verdict.class }}"><strong>{{ verdict.text }}</strong>
{%- if let Some(note) = verdict.note %} <span class="explanation{% if note.locked %} locked{% endif %}">{{ note.text }}</span>{% endif -%}
</div>{% endif -%}
</section>
{%- endfor %}
</div>"#,
  ext = "html"
)]
struct ChoiceGameTemplate {
  game_class: &'static str,
  action: &'static str,
  field: &'static str,
  items: Vec<ChoiceItem>,
}

#[derive(Template)]
#[template(
  source = r#"<div class="game flashcard"><div class="counter">CARD {{ position }} / {{ total }}</div><div class="card{% if flipped %} flipped{% endif %}" data-action="flip"><div class="front"><span class="label">Term</span><h3>{{ front }}</h3></div><div class="back"><span class="label">Definition</span><p>{{ back }}</p></div></div><div class="nav"><button data-action="prev">&larr;</button><button data-action="next">&rarr;</button></div></div>"#,
  ext = "html"
)]
struct FlashcardTemplate<'a> {
  position: usize,
  total: usize,
  flipped: bool,
  front: &'a str,
  back: &'a str,
}

#[derive(Template)]
#[template(
  source = r#"<div class="game fill-blank">
{%- for item in items %}
<section class="item" data-item="{{ item.index }}"><div class="sentence">{{ item.before }}<input type="text" class="blank {{ item.status }}" data-action="input" value="{{ item.draft }}" placeholder="..."{% if item.locked %} disabled{% endif %}/>{{ item.after }}</div><div class="status">
{%- if let Some(verdict) = item.verdict %}<span class="{{ verdict.class }}">{{ verdict.text }}</span>{% endif %}
{%- if let Some(note) = item.note %}<span class="explanation{% if note.locked %} locked{% endif %}">{{ note.text }}</span>{% endif -%}
</div><button data-action="check"{% if !item.can_check %} disabled{% endif %}>Check</button></section>
{%- endfor %}
</div>"#,
  ext = "html"
)]
struct FillBlankTemplate {
  items: Vec<BlankRow>,
}

#[derive(Template)]
#[template(
  source = r#"<div class="game qa">
{%- for item in items %}
<section class="item" data-item="{{ item.index }}"><h3 class="number">Essay question {{ item.number }}</h3><p class="question">{{ item.question }}</p>
{%- if item.revealed %}
{%- if let Some(answer) = item.suggested_answer %}<blockquote class="suggested">"{{ answer }}"</blockquote>{% endif %}
{%- if !item.key_points.is_empty() %}<ul class="key-points">{% for point in item.key_points %}<li>{{ point }}</li>{% endfor %}</ul>{% endif %}
{%- if let Some(note) = item.note %}<span class="explanation{% if note.locked %} locked{% endif %}">{{ note.text }}</span>{% endif -%}
<button class="hide" data-action="hide">Hide answer</button>
{%- else -%}
<button class="reveal" data-action="reveal">Show suggested answer</button>
{%- endif -%}
</section>
{%- endfor %}
</div>"#,
  ext = "html"
)]
struct QaTemplate {
  items: Vec<QaRow>,
}

fn mark_class(mark: Mark) -> &'static str {
  match mark {
    Mark::Open => "open",
    Mark::Correct => "correct",
    Mark::Wrong => "wrong",
    Mark::Dimmed => "dimmed",
  }
}

fn feedback_verdict(feedback: &Feedback, ui: &UiConfig) -> Verdict {
  let (class, text) = if feedback.correct { ("correct", "Correct!") } else { ("wrong", "Explanation:") };
  Verdict { class, text: text.to_string(), note: Note::from_explanation(&feedback.explanation, ui) }
}

fn mcq_item(item: &McqItemView, ui: &UiConfig) -> ChoiceItem {
  ChoiceItem {
    index: item.number - 1,
    number: item.number,
    prompt: item.question.clone(),
    choices: item
      .options
      .iter()
      .enumerate()
      .map(|(j, opt)| Choice { label: opt.text.clone(), class: mark_class(opt.mark), value: j.to_string() })
      .collect(),
    answered: item.answered,
    verdict: item.feedback.as_ref().map(|fb| feedback_verdict(fb, ui)),
  }
}

fn true_false_item(item: &TfItemView, ui: &UiConfig) -> ChoiceItem {
  ChoiceItem {
    index: item.number - 1,
    number: item.number,
    prompt: item.statement.clone(),
    choices: item
      .choices
      .iter()
      .map(|c| Choice {
        label: (if c.value { "TRUE" } else { "FALSE" }).to_string(),
        class: mark_class(c.mark),
        value: c.value.to_string(),
      })
      .collect(),
    answered: item.answered,
    verdict: item.feedback.as_ref().map(|fb| feedback_verdict(fb, ui)),
  }
}

fn blank_row(item: &BlankItemView, ui: &UiConfig) -> BlankRow {
  let verdict = match (item.status, &item.expected) {
    (BlankStatus::Wrong, Some(expected)) => Some(("wrong", format!("Answer: {}", expected))),
    (BlankStatus::Wrong, None) => Some(("wrong", "Not quite.".to_string())),
    (BlankStatus::Correct, _) => Some(("correct", "Correct!".to_string())),
    (BlankStatus::Pending, _) => None,
  };
  BlankRow {
    index: item.number - 1,
    before: item.before.clone(),
    after: item.after.clone(),
    draft: item.draft.clone(),
    status: match item.status {
      BlankStatus::Pending => "pending",
      BlankStatus::Wrong => "wrong",
      BlankStatus::Correct => "correct",
    },
    locked: item.locked,
    can_check: item.can_check,
    verdict: verdict.map(|(class, text)| Verdict { class, text, note: None }),
    note: item.explanation.as_ref().and_then(|e| Note::from_explanation(e, ui)),
  }
}

fn qa_row(item: &QaItemView, ui: &UiConfig) -> QaRow {
  QaRow {
    index: item.number - 1,
    number: item.number,
    question: item.question.clone(),
    revealed: item.revealed,
    suggested_answer: item.suggested_answer.clone(),
    key_points: item.key_points.clone(),
    note: item.explanation.as_ref().and_then(|e| Note::from_explanation(e, ui)),
  }
}

fn card_template(card: &CardView) -> FlashcardTemplate<'_> {
  FlashcardTemplate {
    position: card.position,
    total: card.total,
    flipped: card.flipped,
    front: card.front.as_deref().unwrap_or_default(),
    back: card.back.as_deref().unwrap_or_default(),
  }
}

/// Render a view as an HTML fragment. All view text is escaped by the templates.
pub fn render_view(view: &GameView, ui: &UiConfig) -> askama::Result<String> {
  match view {
    GameView::DataError { mode, message } => DataErrorTemplate { mode: *mode, message }.render(),
    GameView::MultipleChoice { items } => ChoiceGameTemplate {
      game_class: "mcq",
      action: "select",
      field: "option",
      items: items.iter().map(|it| mcq_item(it, ui)).collect(),
    }
    .render(),
    GameView::TrueFalse { items } => ChoiceGameTemplate {
      game_class: "true-false",
      action: "choose",
      field: "value",
      items: items.iter().map(|it| true_false_item(it, ui)).collect(),
    }
    .render(),
    GameView::Flashcard { card } => card_template(card).render(),
    GameView::FillBlank { items } => FillBlankTemplate { items: items.iter().map(|it| blank_row(it, ui)).collect() }.render(),
    GameView::Qa { items } => QaTemplate { items: items.iter().map(|it| qa_row(it, ui)).collect() }.render(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::games::{Action, Game};
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use serde_json::json;

  fn ui() -> UiConfig {
    UiConfig::default()
  }

  fn render(game: &Game, premium: bool) -> String {
    render_view(&game.view(premium), &ui()).unwrap()
  }

  #[test]
  fn item_text_is_escaped() {
    let game = Game::new(
      GameMode::TrueFalse,
      json!([{ "statement": r#"<b>"A" & B</b>"#, "is_correct": true }]),
      &mut StdRng::seed_from_u64(0),
    );
    let html = render(&game, false);
    assert!(html.contains("&lt;b&gt;&quot;A&quot; &amp; B&lt;/b&gt;"));
    assert!(!html.contains("<b>"));
  }

  #[test]
  fn data_error_is_visible() {
    let html = render_view(&GameView::data_error(GameMode::Flashcard), &ui()).unwrap();
    assert_eq!(html, r#"<div class="data-error" data-mode="flashcard">Card data error.</div>"#);
  }

  #[test]
  fn locked_explanation_shows_upgrade_text() {
    let mut game = Game::new(
      GameMode::TrueFalse,
      json!([{ "statement": "1 < 2", "is_correct": true, "explanation": "secret" }]),
      &mut StdRng::seed_from_u64(0),
    );
    game.apply(Action::Choose { item: 0, value: true }).unwrap();

    let free = render(&game, false);
    assert!(free.contains("1 &lt; 2"));
    assert!(free.contains("(Upgrade to Pro to view)"));
    assert!(!free.contains("secret"));
    assert!(free.contains(r#"class="choice correct""#));
    assert!(free.contains(" disabled"));

    let premium = render(&game, true);
    assert!(premium.contains(r#"<span class="explanation">secret</span>"#));
  }

  #[test]
  fn mcq_buttons_post_display_indexes() {
    let game = Game::new(
      GameMode::MultipleChoice,
      json!([{ "question": "2 + 2?", "options": ["4", "5"], "correct_answer": 0 }]),
      &mut StdRng::seed_from_u64(0),
    );
    let html = render(&game, true);
    assert!(html.contains(r#"data-action="select" data-option="0""#));
    assert!(html.contains(r#"data-option="1""#));
    assert!(!html.contains("feedback"));
  }

  #[test]
  fn unrevealed_qa_hides_answer_and_revealed_omits_missing_parts() {
    let mut game = Game::new(
      GameMode::Qa,
      json!([{ "question": "Why?", "suggested_answer": "Because." }]),
      &mut StdRng::seed_from_u64(0),
    );
    let hidden = render(&game, true);
    assert!(!hidden.contains("Because."));
    assert!(hidden.contains(r#"data-action="reveal""#));

    game.apply(Action::Reveal { item: 0 }).unwrap();
    let shown = render(&game, true);
    assert!(shown.contains("Because."));
    assert!(!shown.contains("key-points"));
    assert!(!shown.contains("explanation"));
  }

  #[test]
  fn wrong_blank_shows_expected_word() {
    let mut game = Game::new(
      GameMode::FillBlank,
      json!([{ "sentence_with_blank": "Gold is [BLANK].", "hidden_word": "Au" }]),
      &mut StdRng::seed_from_u64(0),
    );
    game.apply(Action::Check { item: 0, text: Some("Ag".into()) }).unwrap();
    let html = render(&game, false);
    assert!(html.contains("Answer: Au"));
    assert!(html.contains(r#"value="Ag""#));
  }

  #[test]
  fn flashcard_shows_position() {
    let game = Game::new(
      GameMode::Flashcard,
      json!([{ "front": "A", "back": "B" }, { "front": "C", "back": "D" }]),
      &mut StdRng::seed_from_u64(0),
    );
    let html = render(&game, false);
    assert!(html.contains("CARD 1 / 2"));
    assert!(!html.contains(" flipped"));
  }
}
