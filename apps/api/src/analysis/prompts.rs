// Prompt templates for handwriting analysis.
// Placeholders are substituted with `str::replace`; keep them unique.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Anda adalah seorang ahli grafologi berpengalaman.
Analisis tulisan tangan pada gambar terlampir dan simpulkan kepribadian penulisnya.

Perhatikan: kemiringan huruf, tekanan pena, ukuran huruf, spasi antar kata, margin, bentuk huruf, dan tanda tangan (jika ada).
{notes_section}
Kembalikan JSON dengan struktur PERSIS seperti berikut:
{
  "personalitySummary": "ringkasan kepribadian dalam 2-4 kalimat",
  "traits": [
    {
      "feature": "nama fitur tulisan, misalnya Kemiringan",
      "observation": "apa yang terlihat pada gambar",
      "interpretation": "arti fitur tersebut bagi kepribadian",
      "confidence": "Tinggi | Sedang | Rendah"
    }
  ],
  "strengths": ["kekuatan"],
  "weaknesses": ["kelemahan"],
  "graphologyBasis": ["prinsip grafologi yang menjadi dasar analisis"]
}

WAJIB: isi minimal 3 item pada "traits".
WAJIB: semua teks dalam Bahasa Indonesia.
"#;

pub const CONTEXT_PROMPT_TEMPLATE: &str = r#"Anda adalah seorang ahli grafologi yang menilai kecocokan penulis dengan sebuah konteks.
Analisis tulisan tangan pada gambar terlampir, lalu nilai seberapa cocok karakter penulis dengan konteks berikut.

Jenis konteks: {context_type}
Konteks:
"""
{context}
"""

Kembalikan JSON dengan struktur PERSIS seperti berikut:
{
  "suitabilityScore": 0,
  "relevanceExplanation": "penjelasan mengapa skor tersebut diberikan",
  "actionableAdvice": ["saran konkret untuk penulis"],
  "specificRisks": ["risiko spesifik dalam konteks ini"]
}

WAJIB: "suitabilityScore" berupa bilangan bulat 0 sampai 100.
WAJIB: setiap saran dan risiko harus terkait langsung dengan konteks di atas.
WAJIB: semua teks dalam Bahasa Indonesia.
"#;

const DEFAULT_CONTEXT_TYPE: &str = "umum";

/// Prompt for the unconditioned analysis. `notes` is optional writer metadata.
pub fn build_analysis_prompt(notes: Option<&str>) -> String {
    let notes_section = match notes.map(str::trim).filter(|n| !n.is_empty()) {
        Some(notes) => format!("\nCatatan tambahan dari pengguna: {notes}\n"),
        None => String::new(),
    };
    let prompt = ANALYSIS_PROMPT_TEMPLATE.replace("{notes_section}", &notes_section);
    format!("{prompt}\n{JSON_ONLY_INSTRUCTION}")
}

/// Prompt for the context-scored analysis.
pub fn build_context_prompt(context: &str, context_type: Option<&str>) -> String {
    let context_type = context_type
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_CONTEXT_TYPE);
    // context_type first: a user-supplied context containing "{context_type}" stays literal.
    let prompt = CONTEXT_PROMPT_TEMPLATE
        .replace("{context_type}", context_type)
        .replace("{context}", context.trim());
    format!("{prompt}\n{JSON_ONLY_INSTRUCTION}")
}
