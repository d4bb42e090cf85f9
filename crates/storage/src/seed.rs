//! Starter question bank for a fresh database.

use assess_core::model::{AssessmentDraft, AssessmentId, QuestionContent, SkillType};
use chrono::{DateTime, Utc};

use crate::repository::{NewQuestionRecord, Storage, StorageError};

struct SeedQuestion {
    skill: SkillType,
    instruction: &'static str,
    choices: &'static [&'static str],
    passage: Option<&'static str>,
    answer: &'static str,
    difficulty: u32,
}

const SCREENING_QUESTIONS: &[SeedQuestion] = &[
    SeedQuestion {
        skill: SkillType::SightWord,
        instruction: "Which word says 'the'?",
        choices: &["the", "a", "an", "is"],
        passage: None,
        answer: "the",
        difficulty: 1,
    },
    SeedQuestion {
        skill: SkillType::SightWord,
        instruction: "Find the word 'and'",
        choices: &["and", "an", "at", "as"],
        passage: None,
        answer: "and",
        difficulty: 1,
    },
    SeedQuestion {
        skill: SkillType::SightWord,
        instruction: "Which word is 'can'?",
        choices: &["can", "cat", "cap", "car"],
        passage: None,
        answer: "can",
        difficulty: 1,
    },
    SeedQuestion {
        skill: SkillType::LetterSound,
        instruction: "What sound does the letter M make?",
        choices: &["m", "n", "b", "w"],
        passage: None,
        answer: "m",
        difficulty: 1,
    },
    SeedQuestion {
        skill: SkillType::LetterSound,
        instruction: "What sound does the letter N make?",
        choices: &["n", "m", "h", "u"],
        passage: None,
        answer: "n",
        difficulty: 1,
    },
    SeedQuestion {
        skill: SkillType::ReadingFluency,
        instruction: "Read this sentence: 'The cat sat on the mat.'",
        choices: &[],
        passage: None,
        answer: "completed",
        difficulty: 1,
    },
    SeedQuestion {
        skill: SkillType::Comprehension,
        instruction: "What color was the dog?",
        choices: &["brown", "black", "white", "yellow"],
        passage: Some(
            "Tom has a brown dog. The dog likes to play ball. Tom throws the ball and the dog runs fast.",
        ),
        answer: "brown",
        difficulty: 2,
    },
];

/// Number of questions `seed_screening` inserts.
pub const SCREENING_QUESTION_COUNT: usize = SCREENING_QUESTIONS.len();

/// Insert the early reading screening assessment and its question bank.
///
/// # Errors
///
/// Returns `StorageError` if any insert fails.
pub async fn seed_screening(
    storage: &Storage,
    now: DateTime<Utc>,
) -> Result<AssessmentId, StorageError> {
    let mut draft = AssessmentDraft::new("Early Reading Screening", "screening");
    draft.description = Some(
        "Quick check of sight words, letter sounds, fluency and comprehension.".to_owned(),
    );
    draft.target_skills = vec![
        SkillType::SightWord,
        SkillType::LetterSound,
        SkillType::ReadingFluency,
        SkillType::Comprehension,
    ];
    draft.estimated_minutes = Some(15);
    draft.question_count = u32::try_from(SCREENING_QUESTION_COUNT).unwrap_or(u32::MAX);

    let assessment_id = storage.assessments.insert_assessment(draft, now).await?;

    for seed in SCREENING_QUESTIONS {
        let mut content = QuestionContent::with_choices(seed.instruction, seed.choices.iter().copied());
        if let Some(passage) = seed.passage {
            content = content.with_passage(passage);
        }
        storage
            .questions
            .insert_question(NewQuestionRecord {
                assessment_id,
                skill: seed.skill,
                content,
                correct_answer: seed.answer.to_owned(),
                difficulty: seed.difficulty,
            })
            .await?;
    }

    tracing::info!(
        %assessment_id,
        questions = SCREENING_QUESTION_COUNT,
        "seeded screening assessment"
    );
    Ok(assessment_id)
}
