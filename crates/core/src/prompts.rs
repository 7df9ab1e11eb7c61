//! Prompt templates for every narrative the agents request.
//!
//! Each function renders one prompt from typed inputs. The persona prompts
//! are sent as the system message by the intake and advisory agents.

use std::fmt::Write;

use crate::intake::{PatientIntake, PatientProfile};
use crate::medication::ReminderTime;
use crate::vitals::VitalReading;

pub const INTAKE_SYSTEM_PROMPT: &str = "You are a compassionate healthcare intake specialist. \
Your role is to collect comprehensive patient information while making them feel comfortable \
and understood. Ask clear, empathetic questions and validate their concerns.";

pub const ADVISOR_SYSTEM_PROMPT: &str = "You are an experienced healthcare advisor specializing \
in chronic disease management. Provide evidence-based, personalized health recommendations. \
Always emphasize consulting with healthcare providers for medical decisions. Focus on lifestyle \
modifications, medication adherence, and symptom management.";

const GENERAL_WELLNESS: &str = "General wellness";

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None reported".to_string()
    } else {
        items.join(", ")
    }
}

/// Acknowledge a completed intake and summarize it for the care team.
pub fn intake(patient: &PatientIntake) -> String {
    format!(
        "A new patient has completed intake.\n\n\
         Age: {age}\n\
         Gender: {gender}\n\
         Chronic conditions: {conditions}\n\
         Current medications: {medications}\n\
         Allergies: {allergies}\n\
         Primary concern: {concern}\n\n\
         Write a short, warm acknowledgement to the patient and a one-paragraph \
         summary of the key information for the care team.",
        age = patient.age,
        gender = patient.gender,
        conditions = join_or_none(&patient.chronic_conditions),
        medications = join_or_none(&patient.current_medications),
        allergies = join_or_none(&patient.allergies),
        concern = patient.primary_concern,
    )
}

pub fn triage(patient: &PatientIntake) -> String {
    format!(
        "Based on the following patient information, provide a triage assessment \
         and recommend a priority level:\n\n\
         Conditions: {conditions}\n\
         Current Concern: {concern}",
        conditions = patient.chronic_conditions.join(", "),
        concern = patient.primary_concern,
    )
}

/// Trend prompt built from the window size and the latest reading.
pub fn vital_trends(readings: usize, latest: &VitalReading) -> String {
    format!(
        "Analyze the following vital signs trends and provide insights:\n\
         Number of readings: {readings}\n\
         Latest BP: {systolic}/{diastolic}\n\
         Latest HR: {hr}\n\
         Latest Temp: {temp}\n\n\
         Provide a summary of trends and any concerns.",
        systolic = latest.systolic,
        diastolic = latest.diastolic,
        hr = latest.heart_rate,
        temp = latest.temperature,
    )
}

pub fn medication_reminder(
    name: &str,
    dosage: &str,
    instructions: &str,
    due_at: ReminderTime,
) -> String {
    format!(
        "Generate a friendly medication reminder for:\n\
         Medication: {name}\n\
         Dosage: {dosage}\n\
         Scheduled time: {due_at}\n\
         Instructions: {instructions}"
    )
}

pub fn personalized_advice(profile: &PatientProfile) -> String {
    let age = profile
        .age
        .map_or_else(|| "Unknown".to_string(), |a| a.to_string());
    format!(
        "Provide personalized health advice for a patient with:\n\n\
         Conditions: {conditions}\n\
         Age: {age}\n\
         Current Medications: {medications}\n\
         Recent Concern: {concern}\n\n\
         Provide advice on:\n\
         1. Lifestyle modifications\n\
         2. Diet recommendations\n\
         3. Exercise guidelines\n\
         4. Stress management\n\
         5. Sleep hygiene",
        conditions = profile.chronic_conditions.join(", "),
        medications = profile.current_medications.join(", "),
        concern = profile.recent_concern.as_deref().unwrap_or(GENERAL_WELLNESS),
    )
}

pub fn symptom_assessment(description: &str, conditions: &[String]) -> String {
    format!(
        "A patient with {conditions} reports: \"{description}\"\n\n\
         Provide:\n\
         1. Possible explanations related to their conditions\n\
         2. Self-care recommendations\n\
         3. Warning signs requiring immediate medical attention\n\
         4. When to contact their healthcare provider",
        conditions = join_or_none(conditions),
    )
}

pub fn wellness_plan(duration_days: u32, goals: &[String]) -> String {
    let mut prompt = format!("Create a {duration_days}-day wellness plan for a patient with goals:\n");
    for goal in goals {
        let _ = writeln!(prompt, "- {goal}");
    }
    prompt.push_str(
        "\nInclude:\n\
         - Weekly objectives\n\
         - Daily habits to develop\n\
         - Milestones and checkpoints\n\
         - Success metrics",
    );
    prompt
}

pub fn education(topic: &str, level: &str) -> String {
    format!(
        "Provide patient education on: {topic}\n\n\
         Level: {level}\n\n\
         Include:\n\
         - Clear explanation in simple terms\n\
         - Why it matters for their health\n\
         - Practical tips\n\
         - Common misconceptions\n\
         - Resources for learning more"
    )
}
