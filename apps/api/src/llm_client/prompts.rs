// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to every prompt that expects a JSON answer.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    ATURAN OUTPUT (WAJIB): \
    Jawab HANYA dengan satu objek JSON yang valid. \
    JANGAN gunakan markdown code fence. \
    JANGAN menambahkan teks, penjelasan, atau permintaan maaf di luar objek JSON.";
