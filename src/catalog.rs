// src/catalog.rs
use crate::models::{new_id, Exercise, ExerciseTemplate, ValidationError, BODY_PART_SEPARATOR};
use reqwest::Url;

const IMAGE_BASE_URL: &str = "https://source.unsplash.com/150x150/";

/// Body parts recognised by the catalog, in display order.
pub const BODY_PARTS: [&str; 9] = [
    "Warm-up",
    "Chest",
    "Back",
    "Legs",
    "Shoulders",
    "Arms",
    "Core",
    "Running",
    "Cool-down",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredefinedExercise {
    pub name: &'static str,
    image_keywords: &'static str,
}

impl PredefinedExercise {
    const fn new(name: &'static str, image_keywords: &'static str) -> Self {
        Self {
            name,
            image_keywords,
        }
    }

    #[must_use]
    pub fn image_url(&self) -> String {
        match Url::parse(IMAGE_BASE_URL) {
            Ok(mut url) => {
                url.set_query(Some(self.image_keywords));
                url.to_string()
            }
            Err(_) => IMAGE_BASE_URL.to_string(),
        }
    }
}

const WARM_UP: &[PredefinedExercise] = &[
    PredefinedExercise::new("Jumping Jacks", "jumping jacks,fitness"),
    PredefinedExercise::new("Arm Circles", "arm circles,warmup"),
    PredefinedExercise::new("Leg Swings", "leg swings,stretching"),
    PredefinedExercise::new("High Knees", "high knees,exercise"),
    PredefinedExercise::new("Butt Kicks", "butt kicks,exercise"),
];

const CHEST: &[PredefinedExercise] = &[
    PredefinedExercise::new("Bench Press", "bench press,gym"),
    PredefinedExercise::new("Push-up", "pushup,fitness"),
    PredefinedExercise::new("Dumbbell Flyes", "dumbbell flyes,chest workout"),
    PredefinedExercise::new("Incline Dumbbell Press", "incline dumbbell press,gym"),
    PredefinedExercise::new("Cable Crossover", "cable crossover,gym"),
    PredefinedExercise::new("Dips (Chest Focus)", "chest dips,bodyweight exercise"),
    PredefinedExercise::new("Machine Chest Press", "chest press machine,gym"),
];

const BACK: &[PredefinedExercise] = &[
    PredefinedExercise::new("Pull-up", "pull-up,fitness"),
    PredefinedExercise::new("Deadlift", "deadlift,powerlifting"),
    PredefinedExercise::new("Bent-over Row", "barbell row,gym"),
    PredefinedExercise::new("Lat Pulldown", "lat pulldown,gym machine"),
    PredefinedExercise::new("Seated Cable Row", "cable row,gym"),
    PredefinedExercise::new("T-Bar Row", "t-bar row,back workout"),
    PredefinedExercise::new("Good Mornings", "good morning exercise,barbell"),
];

const LEGS: &[PredefinedExercise] = &[
    PredefinedExercise::new("Squat", "barbell squat,legs"),
    PredefinedExercise::new("Lunge", "dumbbell lunge,legs"),
    PredefinedExercise::new("Leg Press", "leg press,gym"),
    PredefinedExercise::new("Romanian Deadlift", "romanian deadlift,hamstrings"),
    PredefinedExercise::new("Calf Raise", "calf raise,gym"),
    PredefinedExercise::new("Hip Thrust", "hip thrust,glutes"),
    PredefinedExercise::new("Goblet Squat", "goblet squat,kettlebell"),
    PredefinedExercise::new("Leg Extension", "leg extension machine,quads"),
    PredefinedExercise::new("Hamstring Curl", "hamstring curl machine,legs"),
];

const SHOULDERS: &[PredefinedExercise] = &[
    PredefinedExercise::new("Overhead Press", "overhead press,shoulders"),
    PredefinedExercise::new("Lateral Raise", "lateral raise,dumbbell"),
    PredefinedExercise::new("Front Raise", "front raise,shoulders"),
    PredefinedExercise::new("Face Pull", "face pull,cable machine"),
    PredefinedExercise::new("Arnold Press", "arnold press,dumbbell"),
    PredefinedExercise::new("Shrugs", "dumbbell shrugs,traps"),
];

const ARMS: &[PredefinedExercise] = &[
    PredefinedExercise::new("Bicep Curl", "bicep curl,dumbbell"),
    PredefinedExercise::new("Hammer Curl", "hammer curl,biceps"),
    PredefinedExercise::new("Chin-up", "chin-up,bodyweight"),
    PredefinedExercise::new("Preacher Curl", "preacher curl,gym"),
    PredefinedExercise::new("Tricep Dips", "tricep dips,bodyweight"),
    PredefinedExercise::new("Tricep Pushdown", "tricep pushdown,cable machine"),
    PredefinedExercise::new("Skull Crusher", "skull crusher,triceps"),
    PredefinedExercise::new("Close Grip Bench Press", "close grip bench press,triceps"),
];

const CORE: &[PredefinedExercise] = &[
    PredefinedExercise::new("Plank", "plank,core exercise"),
    PredefinedExercise::new("Crunches", "crunches,abs"),
    PredefinedExercise::new("Leg Raises", "leg raises,core"),
    PredefinedExercise::new("Russian Twist", "russian twist,abs"),
    PredefinedExercise::new("Cable Crunches", "cable crunch,gym"),
    PredefinedExercise::new("Hanging Knee Raises", "hanging knee raises,abs"),
];

const RUNNING: &[PredefinedExercise] = &[
    PredefinedExercise::new("Treadmill Run", "treadmill,running"),
    PredefinedExercise::new("Outdoor Run", "outdoor running,trail"),
    PredefinedExercise::new("Sprints", "sprinting,track"),
];

const COOL_DOWN: &[PredefinedExercise] = &[
    PredefinedExercise::new("Quad Stretch", "quad stretch,stretching"),
    PredefinedExercise::new("Hamstring Stretch", "hamstring stretch,flexibility"),
    PredefinedExercise::new("Cat-Cow Stretch", "cat cow pose,yoga"),
    PredefinedExercise::new("Downward Dog", "downward dog,yoga"),
    PredefinedExercise::new("Pigeon Pose", "pigeon pose,yoga hip stretch"),
    PredefinedExercise::new("Child's Pose", "childs pose,yoga"),
];

/// Predefined exercises for a body part. Unknown body parts have none.
#[must_use]
pub fn lookup(body_part: &str) -> &'static [PredefinedExercise] {
    match body_part {
        "Warm-up" => WARM_UP,
        "Chest" => CHEST,
        "Back" => BACK,
        "Legs" => LEGS,
        "Shoulders" => SHOULDERS,
        "Arms" => ARMS,
        "Core" => CORE,
        "Running" => RUNNING,
        "Cool-down" => COOL_DOWN,
        _ => &[],
    }
}

#[must_use]
pub fn is_known_body_part(body_part: &str) -> bool {
    BODY_PARTS.contains(&body_part)
}

/// A candidate exercise offered while selecting exercises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub body_part: String,
    pub image_url: Option<String>,
    pub is_custom: bool,
}

impl CatalogEntry {
    #[must_use]
    pub fn to_template(&self) -> ExerciseTemplate {
        ExerciseTemplate {
            name: self.name.clone(),
            body_part: self.body_part.clone(),
            image_url: self.image_url.clone(),
            is_custom: self.is_custom,
        }
    }
}

/// Predefined and custom exercises for a body part label, filtered by a
/// case-insensitive substring of the name. A combined label ("Chest & Arms")
/// offers the exercises of every part. Names are unique, first entry wins.
#[must_use]
pub fn available_exercises(label: &str, custom: &[Exercise], search: &str) -> Vec<CatalogEntry> {
    let needle = search.trim().to_lowercase();
    let mut entries: Vec<CatalogEntry> = Vec::new();

    for part in label.split(BODY_PART_SEPARATOR) {
        let predefined = lookup(part).iter().map(|ex| CatalogEntry {
            name: ex.name.to_string(),
            body_part: part.to_string(),
            image_url: Some(ex.image_url()),
            is_custom: false,
        });
        let customs = custom
            .iter()
            .filter(|ex| ex.body_part == part)
            .map(|ex| CatalogEntry {
                name: ex.name.clone(),
                body_part: ex.body_part.clone(),
                image_url: ex.image_url.clone(),
                is_custom: true,
            });

        for entry in predefined.chain(customs) {
            if !entry.name.to_lowercase().contains(&needle) {
                continue;
            }
            if entries.iter().any(|e| e.name == entry.name) {
                continue;
            }
            entries.push(entry);
        }
    }
    entries
}

/// Builds a custom catalog entry. The result carries no sets.
pub fn new_custom_exercise(
    name: &str,
    body_part: &str,
    image_url: Option<String>,
) -> Result<Exercise, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingExerciseName);
    }
    let body_part = body_part.trim();
    if body_part.is_empty() {
        return Err(ValidationError::MissingBodyPart);
    }
    Ok(Exercise {
        id: new_id(&format!("custom-{}", name.replace(char::is_whitespace, "-"))),
        name: name.to_string(),
        body_part: body_part.to_string(),
        image_url: image_url.filter(|url| !url.trim().is_empty()),
        is_custom: true,
        sets: Vec::new(),
    })
}
