// Prompt text for candidate scoring. Keep the reply contract ("only a number")
// in sync with `scoring::requester::parse_score`.

use crate::models::candidate::Candidate;

pub const SCORING_SYSTEM: &str = "Expert startup investor. Return only a score 0-100.";

/// Builds the user prompt embedding every free-text answer of the candidate.
pub fn candidate_prompt(c: &Candidate) -> String {
    format!(
        "Score this founder application 0-100 based on traction, technical ability, \
problem-solution fit, expertise, and ambition.

{first} {last} - {company}
Technical: {technical} | {location} | {school_or_work}
Project: {project}
Problem: {problem}
Expertise: {expertise}
Competitors: {competitors}
Past: {past}
Achievements: {achievements}
Challenge: {challenge}

Return ONLY a number 0-100.",
        first = c.first_name,
        last = c.last_name,
        company = c.company,
        technical = c.technical,
        location = c.location,
        school_or_work = c.school_or_work,
        project = c.project_description,
        problem = c.problem_solving,
        expertise = c.expertise,
        competitors = c.competitors,
        past = c.past_work,
        achievements = c.achievements,
        challenge = c.risk_or_challenge,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_every_answer() {
        let c = Candidate {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            company: "Engines Ltd".into(),
            technical: "Yes".into(),
            location: "London".into(),
            school_or_work: "Self-taught".into(),
            project_description: "general purpose computer".into(),
            problem_solving: "tables are error prone".into(),
            expertise: "mathematics".into(),
            competitors: "difference engine".into(),
            past_work: "notes on the engine".into(),
            achievements: "first program".into(),
            risk_or_challenge: "funding".into(),
            ..Default::default()
        };

        let prompt = candidate_prompt(&c);
        for needle in [
            "Ada Lovelace - Engines Ltd",
            "Technical: Yes | London | Self-taught",
            "Project: general purpose computer",
            "Problem: tables are error prone",
            "Expertise: mathematics",
            "Competitors: difference engine",
            "Past: notes on the engine",
            "Achievements: first program",
            "Challenge: funding",
        ] {
            assert!(prompt.contains(needle), "missing {needle:?}");
        }
        assert!(prompt.ends_with("Return ONLY a number 0-100."));
    }
}
