pub const SYSTEM_MESSAGE: &str = "És um classificador de projetos de I&D em Portugal.";

const PREAMBLE: &str = "Atribua o seguinte projeto de I&D a um dos seguintes domínios prioritários com base no seu resumo.";
const CATALOG_HEADING: &str = "Domínios disponíveis:";
const SUMMARY_HEADING: &str = "Resumo do projeto:";
const ANSWER_INSTRUCTION: &str = "Responda apenas com o nome do domínio mais adequado.";

/// User message for one project: preamble, catalog, summary, answer format.
pub fn build_user_prompt(catalog_text: &str, summary: &str) -> String {
    format!(
        "{PREAMBLE}\n\n{CATALOG_HEADING}\n{catalog_text}\n\n{SUMMARY_HEADING}\n{summary}\n\n{ANSWER_INSTRUCTION}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_catalog_then_summary() {
        let prompt = build_user_prompt("A - x\nB - y", "Um projeto sobre energia solar.");

        assert!(prompt.starts_with(PREAMBLE));
        assert!(prompt.ends_with(ANSWER_INSTRUCTION));

        let catalog_at = prompt.find("A - x\nB - y").unwrap();
        let summary_at = prompt.find("Um projeto sobre energia solar.").unwrap();
        assert!(prompt.find(CATALOG_HEADING).unwrap() < catalog_at);
        assert!(catalog_at < prompt.find(SUMMARY_HEADING).unwrap());
        assert!(prompt.find(SUMMARY_HEADING).unwrap() < summary_at);
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_user_prompt("A - x", "s"), build_user_prompt("A - x", "s"));
    }
}
