//! Assembly result reports: plain text and PDF rendering.

use asamblea_common::{AppError, AppResult};
use asamblea_db::{
    entities::{assembly, question},
    repositories::{AssemblyRepository, QuestionRepository, VoteRepository},
};
use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::tally::Tally;

/// One question with its final tally.
#[derive(Debug, Clone)]
pub struct ReportSection {
    /// The question, in presentation order.
    pub question: question::Model,
    /// Weighted totals for the question.
    pub tally: Tally,
}

/// Full results of an assembly, one section per question.
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    /// The assembly being reported on.
    pub assembly: assembly::Model,
    /// Per-question tallies in presentation order.
    pub sections: Vec<ReportSection>,
}

/// Service that assembles and renders result reports.
///
/// Building a report reads and aggregates; it never mutates, so it can be
/// requested repeatedly for the same assembly, before or after it ends.
#[derive(Clone)]
pub struct ReportService {
    assembly_repo: AssemblyRepository,
    question_repo: QuestionRepository,
    vote_repo: VoteRepository,
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 8.0;

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        assembly_repo: AssemblyRepository,
        question_repo: QuestionRepository,
        vote_repo: VoteRepository,
    ) -> Self {
        Self {
            assembly_repo,
            question_repo,
            vote_repo,
        }
    }

    /// Build the report data for an assembly.
    pub async fn build(&self, assembly_id: &str) -> AppResult<AssemblyReport> {
        let assembly = self.assembly_repo.get_by_id(assembly_id).await?;
        let questions = self.question_repo.find_by_assembly(assembly_id).await?;

        let mut sections = Vec::with_capacity(questions.len());
        for question in questions {
            let votes = self.vote_repo.find_by_question(&question.id).await?;
            sections.push(ReportSection {
                question,
                tally: Tally::from_votes(&votes),
            });
        }

        Ok(AssemblyReport { assembly, sections })
    }

    /// Tally the votes cast on a single question.
    pub async fn tally_for_question(
        &self,
        question_id: &str,
    ) -> AppResult<(question::Model, Tally)> {
        let question = self.question_repo.get_by_id(question_id).await?;
        let votes = self.vote_repo.find_by_question(&question.id).await?;
        Ok((question, Tally::from_votes(&votes)))
    }

    /// Render a report as plain text, one block per question.
    #[must_use]
    pub fn render_text(report: &AssemblyReport) -> String {
        let mut out = String::new();
        out.push_str(&format!("Resultados - {}\n", report.assembly.name));
        out.push_str(&format!(
            "Inicio: {}\n",
            report.assembly.started_at.format("%Y-%m-%d %H:%M")
        ));
        if let Some(ended_at) = report.assembly.ended_at {
            out.push_str(&format!("Cierre: {}\n", ended_at.format("%Y-%m-%d %H:%M")));
        }
        out.push('\n');

        for section in &report.sections {
            out.push_str(&format!(
                "Pregunta {}: {}\n",
                section.question.order_number, section.question.text
            ));
            out.push_str(&format!("A favor: {}\n", section.tally.a_favor));
            out.push_str(&format!("En contra: {}\n", section.tally.en_contra));
            out.push_str(&format!("Abstenerse: {}\n", section.tally.abstenerse));
            out.push_str(&format!("Total: {}\n\n", section.tally.total()));
        }

        out
    }

    /// Render a report as a single-column A4 PDF.
    pub fn render_pdf(report: &AssemblyReport) -> AppResult<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(
            format!("Resultados - {}", report.assembly.name),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Resultados",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::Report(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::Report(e.to_string()))?;

        let mut layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

        // Runs out of vertical space -> start a new page.
        let next_line = |doc: &printpdf::PdfDocumentReference,
                             layer: &mut printpdf::PdfLayerReference,
                             y: &mut f32| {
            *y -= LINE_HEIGHT_MM;
            if *y < MARGIN_MM {
                let (page, new_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Resultados");
                *layer = doc.get_page(page).get_layer(new_layer);
                *y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
        };

        layer.use_text(
            format!("Resultados - {}", report.assembly.name),
            16.0,
            Mm(MARGIN_MM),
            Mm(y),
            &bold,
        );
        next_line(&doc, &mut layer, &mut y);
        layer.use_text(
            format!(
                "Inicio: {}",
                report.assembly.started_at.format("%Y-%m-%d %H:%M")
            ),
            11.0,
            Mm(MARGIN_MM),
            Mm(y),
            &font,
        );
        if let Some(ended_at) = report.assembly.ended_at {
            next_line(&doc, &mut layer, &mut y);
            layer.use_text(
                format!("Cierre: {}", ended_at.format("%Y-%m-%d %H:%M")),
                11.0,
                Mm(MARGIN_MM),
                Mm(y),
                &font,
            );
        }

        for section in &report.sections {
            next_line(&doc, &mut layer, &mut y);
            next_line(&doc, &mut layer, &mut y);
            layer.use_text(
                format!(
                    "Pregunta {}: {}",
                    section.question.order_number, section.question.text
                ),
                12.0,
                Mm(MARGIN_MM),
                Mm(y),
                &bold,
            );

            for line in [
                format!("A favor: {}", section.tally.a_favor),
                format!("En contra: {}", section.tally.en_contra),
                format!("Abstenerse: {}", section.tally.abstenerse),
                format!("Total: {}", section.tally.total()),
            ] {
                next_line(&doc, &mut layer, &mut y);
                layer.use_text(line, 11.0, Mm(MARGIN_MM), Mm(y), &font);
            }
        }

        doc.save_to_bytes()
            .map_err(|e| AppError::Report(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_report() -> AssemblyReport {
        AssemblyReport {
            assembly: assembly::Model {
                id: "asm1".to_string(),
                name: "Asamblea General 2026".to_string(),
                active: false,
                started_at: Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap(),
                ended_at: Some(Utc.with_ymd_and_hms(2026, 3, 14, 20, 30, 0).unwrap()),
            },
            sections: vec![
                ReportSection {
                    question: question::Model {
                        id: "q1".to_string(),
                        assembly_id: "asm1".to_string(),
                        text: "¿Se aprueba el presupuesto?".to_string(),
                        active: false,
                        order_number: 1,
                    },
                    tally: Tally {
                        a_favor: 40,
                        en_contra: 12,
                        abstenerse: 3,
                    },
                },
                ReportSection {
                    question: question::Model {
                        id: "q2".to_string(),
                        assembly_id: "asm1".to_string(),
                        text: "¿Se renueva la junta?".to_string(),
                        active: false,
                        order_number: 2,
                    },
                    tally: Tally {
                        a_favor: 30,
                        en_contra: 25,
                        abstenerse: 0,
                    },
                },
            ],
        }
    }

    #[test]
    fn test_render_text_lists_each_question_block() {
        let text = ReportService::render_text(&sample_report());

        assert!(text.starts_with("Resultados - Asamblea General 2026\n"));
        assert!(text.contains("Pregunta 1: ¿Se aprueba el presupuesto?\n"));
        assert!(text.contains("A favor: 40\n"));
        assert!(text.contains("En contra: 12\n"));
        assert!(text.contains("Abstenerse: 3\n"));
        assert!(text.contains("Total: 55\n"));
        assert!(text.contains("Pregunta 2: ¿Se renueva la junta?\n"));
        assert!(text.contains("Cierre: 2026-03-14 20:30\n"));
    }

    #[test]
    fn test_render_text_omits_close_time_while_running() {
        let mut report = sample_report();
        report.assembly.ended_at = None;

        let text = ReportService::render_text(&report);

        assert!(!text.contains("Cierre:"));
    }

    #[tokio::test]
    async fn test_tally_for_question_aggregates_votes() {
        use asamblea_db::entities::vote::{self, VoteOption};
        use sea_orm::{DatabaseBackend, MockDatabase};
        use std::sync::Arc;

        let question = sample_report().sections[0].question.clone();
        let votes = vec![
            vote::Model {
                id: "v1".to_string(),
                question_id: "q1".to_string(),
                code_id: "c1".to_string(),
                option: VoteOption::AFavor,
                weight: 2,
                created_at: Utc::now().into(),
            },
            vote::Model {
                id: "v2".to_string(),
                question_id: "q1".to_string(),
                code_id: "c2".to_string(),
                option: VoteOption::Abstenerse,
                weight: 1,
                created_at: Utc::now().into(),
            },
        ];

        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let question_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[question]])
            .into_connection();
        let vote_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([votes])
            .into_connection();

        let service = ReportService::new(
            AssemblyRepository::new(Arc::new(assembly_db)),
            QuestionRepository::new(Arc::new(question_db)),
            VoteRepository::new(Arc::new(vote_db)),
        );

        let (question, tally) = service.tally_for_question("q1").await.unwrap();

        assert_eq!(question.id, "q1");
        assert_eq!(tally.a_favor, 2);
        assert_eq!(tally.abstenerse, 1);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_render_pdf_produces_a_document() {
        let bytes = ReportService::render_pdf(&sample_report()).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_render_pdf_handles_many_questions_across_pages() {
        let mut report = sample_report();
        let template = report.sections[0].clone();
        for n in 3..=40 {
            let mut section = template.clone();
            section.question.order_number = n;
            section.question.text = format!("Pregunta de relleno {n}");
            report.sections.push(section);
        }

        let bytes = ReportService::render_pdf(&report).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }
}
