//! Built-in sample assignments for offline use and first runs.

use duetrack_core::{Assignment, AssignmentType};

/// The eight sample assignments shipped with the tracker.
pub fn seed_assignments() -> Vec<Assignment> {
    vec![
        Assignment::new(1_i64, "React Component Architecture Quiz", "Web Development", AssignmentType::Quiz, "2026-01-18T10:00:00")
            .with_course_code("CS301")
            .with_description("Covering hooks, state management, and component lifecycle"),
        Assignment::new(2_i64, "Database Design Project", "Database Systems", AssignmentType::Project, "2026-01-25T23:59:00")
            .with_course_code("CS402")
            .with_description("Design and implement a normalized database schema"),
        Assignment::new(3_i64, "Algorithm Analysis Assignment", "Data Structures", AssignmentType::Assignment, "2026-01-20T17:00:00")
            .with_course_code("CS201")
            .with_description("Big O notation and time complexity analysis"),
        Assignment::new(4_i64, "Midterm Exam", "Software Engineering", AssignmentType::Exam, "2026-01-22T14:00:00")
            .with_course_code("CS350")
            .with_description("Chapters 1-5, SDLC, Agile, Testing"),
        Assignment::new(5_i64, "Linear Algebra Problem Set", "Mathematics", AssignmentType::Assignment, "2026-02-01T23:59:00")
            .with_course_code("MATH205")
            .with_description("Matrix operations and eigenvalues"),
        Assignment::new(6_i64, "UI/UX Presentation", "Human-Computer Interaction", AssignmentType::Presentation, "2026-01-28T11:00:00")
            .with_course_code("CS380")
            .with_description("Present usability testing results"),
        Assignment::new(7_i64, "Machine Learning Lab 3", "Artificial Intelligence", AssignmentType::Lab, "2026-01-19T23:59:00")
            .with_course_code("CS450")
            .with_description("Implement neural network from scratch"),
        Assignment::new(8_i64, "Research Paper Draft", "Computer Science Research", AssignmentType::Project, "2026-01-30T23:59:00")
            .with_course_code("CS499")
            .with_description("Submit first draft of research paper"),
    ]
}
