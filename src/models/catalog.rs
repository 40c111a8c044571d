//! Built-in demonstration catalog.
//!
//! Six records covering every source, both languages and all research
//! types. The list is fixed for the process lifetime and its order is the
//! order search results come back in.

use super::journal::{JournalRecord, Language, ResearchType, SintaAccreditation, Source};

/// The fixed catalog, in display order.
pub fn demo_catalog() -> Vec<JournalRecord> {
    vec![
        JournalRecord::new(
            "1",
            "Pengaruh Media Sosial Terhadap Perilaku Konsumen Generasi Z",
            2024,
            Source::Sinta,
            Language::Id,
        )
        .with_authors(["Budi Santoso", "Rina Wijaya"])
        .with_abstract(
            "Penelitian ini menganalisis dampak penggunaan media sosial terhadap keputusan \
             pembelian generasi Z. Menggunakan metode kuantitatif dengan 500 responden, \
             ditemukan korelasi signifikan antara intensitas penggunaan media sosial dan \
             impulsive buying behavior.",
        )
        .with_accreditation(SintaAccreditation::S2)
        .with_research_type(ResearchType::Kuantitatif)
        .with_download_url("#")
        .with_doi("10.1234/example.2024.001")
        .with_citations(15),
        // Carries an accreditation despite not being a SINTA record.
        JournalRecord::new(
            "2",
            "Studi Fenomenologi Pengalaman Belajar Daring Mahasiswa",
            2023,
            Source::Garuda,
            Language::Id,
        )
        .with_authors(["Dewi Anggraini", "Ahmad Fauzi", "Maria Lestari"])
        .with_abstract(
            "Penelitian kualitatif ini mengeksplorasi pengalaman belajar daring mahasiswa \
             selama pandemi. Melalui wawancara mendalam dengan 20 informan, teridentifikasi \
             tema-tema utama terkait adaptasi, tantangan, dan strategi coping mahasiswa.",
        )
        .with_accreditation(SintaAccreditation::S3)
        .with_research_type(ResearchType::Kualitatif)
        .with_download_url("#")
        .with_citations(28),
        JournalRecord::new(
            "3",
            "Machine Learning Approach for Indonesian Text Classification",
            2024,
            Source::GoogleScholar,
            Language::En,
        )
        .with_authors(["John Smith", "Agus Prasetyo"])
        .with_abstract(
            "This study proposes a novel machine learning approach for classifying Indonesian \
             text documents. Using a combination of BERT and traditional ML algorithms, we \
             achieved 94% accuracy on the benchmark dataset.",
        )
        .with_research_type(ResearchType::Kuantitatif)
        .with_download_url("#")
        .with_doi("10.5678/ml.indo.2024")
        .with_citations(42),
        JournalRecord::new(
            "4",
            "Analisis Strategi Pemasaran UMKM di Era Digital",
            2023,
            Source::Sinta,
            Language::Id,
        )
        .with_authors(["Siti Nurhaliza", "Bambang Sutrisno"])
        .with_abstract(
            "Penelitian mixed method ini menganalisis strategi pemasaran digital yang efektif \
             untuk UMKM. Kombinasi survei kuantitatif dan studi kasus kualitatif menghasilkan \
             framework strategi pemasaran digital yang applicable.",
        )
        .with_accreditation(SintaAccreditation::S1)
        .with_research_type(ResearchType::Mixed)
        .with_download_url("#")
        .with_citations(56),
        JournalRecord::new(
            "5",
            "Deep Learning for Medical Image Analysis: A Comprehensive Review",
            2024,
            Source::Pubmed,
            Language::En,
        )
        .with_authors(["Emily Chen", "David Lee", "Michael Wong"])
        .with_abstract(
            "This comprehensive review examines the latest advances in deep learning \
             applications for medical image analysis, covering CNN architectures, transfer \
             learning strategies, and clinical validation approaches.",
        )
        .with_research_type(ResearchType::Kualitatif)
        .with_download_url("#")
        .with_doi("10.9999/pubmed.2024.review")
        .with_citations(124),
        JournalRecord::new(
            "6",
            "Transformer Models for Low-Resource Languages",
            2024,
            Source::Arxiv,
            Language::En,
        )
        .with_authors(["Alex Johnson", "Putri Handayani"])
        .with_abstract(
            "We present novel adaptations of transformer architectures for low-resource \
             languages, with specific focus on Indonesian and regional languages. Our approach \
             reduces training data requirements by 60% while maintaining competitive \
             performance.",
        )
        .with_research_type(ResearchType::Kuantitatif)
        .with_download_url("#")
        .with_citations(18),
    ]
}

/// Look up a catalog record by id.
pub fn find_by_id<'a>(catalog: &'a [JournalRecord], id: &str) -> Option<&'a JournalRecord> {
    catalog.iter().find(|r| r.id == id)
}
