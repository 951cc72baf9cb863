//! Built-in demo payloads, served when no AI client is configured.
//!
//! They deliberately use the messy shapes real model output has (wrapper
//! objects, letter-keyed options, string booleans) so the offline path goes
//! through the same normalization as generated data.

use serde_json::{json, Value};

use crate::domain::GameMode;

pub fn demo_payload(mode: GameMode) -> Value {
  match mode {
    GameMode::MultipleChoice => json!({
      "questions": [
        {
          "question": "Which planet is closest to the Sun?",
          "options": { "A": "Venus", "B": "Mercury", "C": "Mars", "D": "Earth" },
          "answer": "B",
          "explanation": "Mercury orbits at about 0.39 AU."
        },
        {
          "question": "What gas do plants absorb for photosynthesis?",
          "options": ["Oxygen", "Nitrogen", "Carbon dioxide", "Helium"],
          "correct_answer": "carbon dioxide",
          "explanation": "CO2 is fixed into sugars in the Calvin cycle."
        },
        {
          "question": "How many sides does a hexagon have?",
          "options": ["5", "6", "7", "8"],
          "correct_answer": 1,
          "explanation": "Hex- means six."
        }
      ]
    }),
    GameMode::TrueFalse => json!([
      { "statement": "Water boils at 100 °C at sea level.", "is_correct": "true", "explanation": "At 1 atm." },
      { "statement": "The Great Wall is visible from the Moon.", "is_correct": false, "explanation": "It is far too narrow." },
      { "statement": "Sound travels faster in water than in air.", "answer": "yes", "explanation": "Water is denser and stiffer." }
    ]),
    GameMode::Flashcard => json!([
      { "front": "Mitochondria", "back": "Organelle that produces most of the cell's ATP." },
      { "front": "Osmosis", "back": "Diffusion of water across a semipermeable membrane." },
      { "front": "Enzyme", "back": "Protein that speeds up a chemical reaction." }
    ]),
    GameMode::FillBlank => json!({
      "items": [
        { "sentence_with_blank": "World War II ended in [BLANK].", "hidden_word": "1945", "explanation": "Japan surrendered in September 1945." },
        { "sentence_with_blank": "The chemical symbol for gold is [BLANK].", "hidden_word": "Au", "explanation": "From Latin aurum." }
      ]
    }),
    GameMode::Qa => json!([
      {
        "question": "Why do seasons change on Earth?",
        "suggested_answer": "Because Earth's axis is tilted relative to its orbit.",
        "key_points": ["Axial tilt of about 23.4°", "Changing angle of sunlight", "Day length varies"],
        "explanation": "Distance from the Sun plays only a minor role."
      }
    ]),
  }
}
