pub const IMAGE_GENERATION: &str = include_str!("../data/prompts/image_generation.txt");
pub const REPLY_SYSTEM: &str = include_str!("../data/prompts/reply_system.txt");
pub const PLANT_PROFILE_SYSTEM: &str = include_str!("../data/prompts/plant_profile_system.txt");
pub const PLANT_PROFILE_USER: &str = include_str!("../data/prompts/plant_profile_user.txt");
pub const ANALYSIS_QUESTION: &str = include_str!("../data/prompts/analysis_question.txt");
pub const HEALTH_SYSTEM: &str = include_str!("../data/prompts/health_system.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// The template is scanned once; substituted values are copied verbatim
/// and never scanned for placeholders themselves.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = &after[..end];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    result.push_str(rest);
    result
}
