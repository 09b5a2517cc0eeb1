// rest_api/src/pipeline.rs
// Keyword triage used by the analyzer service. Table order matters: the first
// department keyword found in the cleaned text decides the department.

use lazy_static::lazy_static;
use regex::Regex;

use models::{Analysis, DiseaseInfo, CRITICAL_FINAL_STATUS};

pub const NORMAL_FINAL_STATUS: &str = "Normal";
pub const DEFAULT_DEPARTMENT: &str = "General";
pub const DEFAULT_PREDICTION: &str = "General Checkup Required";
pub const DEFAULT_DOCTOR: &str = "General Physician";

const CRITICAL_DEPARTMENTS: &[(&str, &str)] = &[
    ("heart", "Cardiology"),
    ("chest", "Cardiology"),
    ("cardiac", "Cardiology"),
    ("sweating", "Cardiology"),
    ("stroke", "Neurology"),
    ("face", "Neurology"),
    ("arm", "Neurology"),
    ("speech", "Neurology"),
    ("paralysis", "Neurology"),
    ("seizure", "Neurology"),
    ("unconscious", "Neurology"),
    ("headache", "Neurology"),
    ("faint", "Neurology"),
    ("accident", "Emergency"),
    ("bleed", "Emergency"),
    ("trauma", "Emergency"),
    ("fracture", "Emergency"),
    ("burn", "Emergency"),
    ("injury", "Emergency"),
    ("cut", "Emergency"),
    ("wound", "Emergency"),
    ("broken", "Emergency"),
    ("crash", "Emergency"),
    ("breath", "Pulmonology"),
    ("chok", "Pulmonology"),
    ("asthma", "Pulmonology"),
    ("vomit", "Gastroenterology"),
    ("poison", "Emergency"),
    ("stomach", "Gastroenterology"),
    ("abdominal", "Gastroenterology"),
];

const DOCTORS: &[(&str, &str)] = &[
    ("Cardiology", "Cardiologist"),
    ("Neurology", "Neurologist"),
    ("Emergency", "Emergency Physician"),
    ("Pulmonology", "Pulmonologist"),
    ("Gastroenterology", "Gastroenterologist"),
    ("General", "General Physician"),
];

const CONDITIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Neurology",
        &[
            ("paralysis", "Stroke / Paralysis"),
            ("speech", "Stroke"),
            ("headache", "Severe Migraine"),
            ("seizure", "Epilepsy"),
            ("unconscious", "Loss of Consciousness"),
        ],
    ),
    (
        "Cardiology",
        &[
            ("chest", "Myocardial Infarction"),
            ("heart", "Cardiac Arrest"),
            ("arm", "Angina"),
            ("faint", "Cardiac Syncope"),
        ],
    ),
    (
        "Emergency",
        &[
            ("accident", "Trauma"),
            ("bleed", "Hemorrhage"),
            ("burn", "Severe Burns"),
            ("fracture", "Bone Fracture"),
        ],
    ),
    ("Pulmonology", &[("breath", "Respiratory Failure"), ("chok", "Obstruction")]),
    ("Gastroenterology", &[("vomit", "GI Bleeding"), ("pain", "Appendicitis/Acute Abdomen")]),
];

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Lower-cases, turns punctuation into spaces and collapses whitespace.
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let spaced = NON_WORD.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}

fn doctor_for(department: &str) -> &'static str {
    DOCTORS
        .iter()
        .find(|(dept, _)| *dept == department)
        .map(|(_, doctor)| *doctor)
        .unwrap_or(DEFAULT_DOCTOR)
}

fn predict(department: &str, critical: bool, cleaned: &str) -> String {
    match CONDITIONS.iter().find(|(dept, _)| *dept == department) {
        Some((_, table)) => {
            let hits: Vec<&str> = table
                .iter()
                .filter(|(keyword, _)| cleaned.contains(keyword))
                .map(|(_, condition)| *condition)
                .collect();
            if hits.is_empty() {
                format!("Critical {} Issue", department)
            } else {
                hits.join(", ")
            }
        }
        None if critical => "Emergency Situation".to_string(),
        None => DEFAULT_PREDICTION.to_string(),
    }
}

/// Runs the keyword triage over `text`. `english_text` is the text the
/// keywords are matched against; no translation happens here, so callers pass
/// the original text unless they translated it themselves.
pub fn analyze(original_text: &str, english_text: &str) -> Analysis {
    let cleaned = preprocess(english_text);

    let matched = CRITICAL_DEPARTMENTS
        .iter()
        .find(|(keyword, _)| cleaned.contains(keyword))
        .map(|(_, department)| *department);
    let (final_status, department) = match matched {
        Some(department) => (CRITICAL_FINAL_STATUS, department),
        None => (NORMAL_FINAL_STATUS, DEFAULT_DEPARTMENT),
    };

    Analysis {
        original_text: Some(original_text.to_string()),
        english_text: Some(english_text.to_string()),
        final_status: final_status.to_string(),
        disease_info: DiseaseInfo {
            top_department: department.to_string(),
            disease_prediction: predict(department, matched.is_some(), &cleaned),
            recommended_doctor: Some(doctor_for(department).to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Analysis {
        analyze(text, text)
    }

    #[test]
    fn preprocess_strips_punctuation_and_spacing() {
        assert_eq!(preprocess("  Chest-PAIN!!\n  since   morning. "), "chest pain since morning");
    }

    #[test]
    fn chest_pain_and_sweating_is_critical_cardiology() {
        let analysis = run("I have severe chest pain and sweating");
        assert_eq!(analysis.final_status, "Critical");
        assert_eq!(analysis.disease_info.top_department, "Cardiology");
        assert_eq!(analysis.disease_info.disease_prediction, "Myocardial Infarction");
        assert_eq!(analysis.disease_info.recommended_doctor.as_deref(), Some("Cardiologist"));
    }

    #[test]
    fn first_keyword_in_table_order_wins() {
        // "arm" is listed under Neurology before any Cardiology condition is looked at.
        let analysis = run("My left arm hurts and I feel dizzy");
        assert_eq!(analysis.disease_info.top_department, "Neurology");
        assert_eq!(analysis.disease_info.disease_prediction, "Critical Neurology Issue");
    }

    #[test]
    fn no_keyword_is_normal_general() {
        let analysis = run("Sudden inability to move right side");
        assert_eq!(analysis.final_status, "Normal");
        assert_eq!(analysis.disease_info.top_department, "General");
        assert_eq!(analysis.disease_info.disease_prediction, "General Checkup Required");
        assert_eq!(analysis.disease_info.recommended_doctor.as_deref(), Some("General Physician"));
    }

    #[test]
    fn headache_is_neurology() {
        let analysis = run("I have a bad headache and fever");
        assert_eq!(analysis.final_status, "Critical");
        assert_eq!(analysis.disease_info.disease_prediction, "Severe Migraine");
    }

    #[test]
    fn all_condition_hits_are_joined() {
        let analysis = run("Serious car accident, huge bleeding");
        assert_eq!(analysis.disease_info.top_department, "Emergency");
        assert_eq!(analysis.disease_info.disease_prediction, "Trauma, Hemorrhage");

        let gi = run("Vomiting blood since morning");
        assert_eq!(gi.disease_info.top_department, "Gastroenterology");
        assert_eq!(gi.disease_info.disease_prediction, "GI Bleeding");
    }

    #[test]
    fn original_text_is_echoed() {
        let analysis = analyze("நெஞ்சு வலி", "chest pain");
        assert_eq!(analysis.original_text.as_deref(), Some("நெஞ்சு வலி"));
        assert_eq!(analysis.disease_info.top_department, "Cardiology");
    }
}
