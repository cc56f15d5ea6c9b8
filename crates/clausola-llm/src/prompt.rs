//! Prompt sent to the LLM for one contract.

const INSTRUCTIONS: &str = r#"Sei un assistente legale. Analizza il contratto in italiano riportato sotto e rispondi SOLO con un oggetto JSON, senza altro testo:
{
  "AI_opinion": "parere sintetico di 2-3 righe sul documento",
  "clauses": [
    {"risk": "HIGH" | "MEDIUM" | "LOW", "text": "testo della clausola", "explanation": "rischio e impatto"}
  ]
}
HIGH: penali elevate, limitazioni di responsabilità estreme, possibili perdite finanziarie rilevanti.
MEDIUM: clausole complesse, ambigue o che richiedono attenzione.
LOW: clausole standard ed eque."#;

/// Build the analysis prompt around the document text.
pub fn build_prompt(document_text: &str) -> String {
    format!(
        "{}\n\nTesto del documento:\n---\n{}\n---",
        INSTRUCTIONS,
        document_text.trim()
    )
}
