//! Reception facts and PV (procès-verbal) generation.
//!
//! A reception looks at the open reserves of a project (optionally narrowed
//! to some blocks and a category), works out whether the handover is late,
//! and renders one of four PV narratives from those two facts.

use crate::lookup::{self, find_by_id};
use crate::models::{
    Block, Category, Contractor, CreateReception, Project, Reception, Reserve,
};
use crate::status::{Priority, ReserveStatus};
use crate::types::{format_date_fr, format_timestamp_fr, Date, EntityId, Timestamp};

/// Days the contractor has to clear reserves listed on a PV.
pub const RESERVE_CURE_DAYS: u32 = 15;

// ---------------------------------------------------------------------------
// Facts
// ---------------------------------------------------------------------------

/// Computed handover facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceptionFacts {
    pub has_reserves: bool,
    pub reserve_count: usize,
    pub urgent_count: usize,
    pub is_on_time: bool,
    /// Zero when on time, otherwise whole days past the project end.
    pub delay_days: i64,
}

/// Open reserves of `project_id`, restricted to `block_ids` when non-empty
/// and to `category_id` when given.
pub fn related_reserves<'a>(
    reserves: &'a [Reserve],
    project_id: &str,
    block_ids: &[EntityId],
    category_id: Option<&str>,
) -> Vec<&'a Reserve> {
    reserves
        .iter()
        .filter(|r| r.project_id == project_id && r.status == ReserveStatus::Open)
        .filter(|r| {
            block_ids.is_empty()
                || r.block_id
                    .as_ref()
                    .is_some_and(|b| block_ids.contains(b))
        })
        .filter(|r| category_id.map_or(true, |c| r.category_id == c))
        .collect()
}

/// Derive the facts. An unknown project end counts as ending `today`.
pub fn compute_facts(related: &[&Reserve], project_end: Option<Date>, today: Date) -> ReceptionFacts {
    let end = project_end.unwrap_or(today);
    let is_on_time = today <= end;
    let delay_days = if is_on_time { 0 } else { (today - end).num_days() };
    ReceptionFacts {
        has_reserves: !related.is_empty(),
        reserve_count: related.len(),
        urgent_count: related
            .iter()
            .filter(|r| r.priority == Priority::Urgent)
            .count(),
        is_on_time,
        delay_days,
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// The four PV narratives, one per (reserves, on time) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PvTemplate {
    /// No reserves, on time: unconditional acceptance.
    Accepted,
    /// No reserves, late: acceptance plus penalty clause.
    AcceptedLate,
    /// Reserves, on time: conditional acceptance.
    WithReserves,
    /// Reserves, late: conditional acceptance plus penalty clause.
    WithReservesLate,
}

impl PvTemplate {
    pub fn select(facts: &ReceptionFacts) -> Self {
        match (facts.has_reserves, facts.is_on_time) {
            (false, true) => PvTemplate::Accepted,
            (false, false) => PvTemplate::AcceptedLate,
            (true, true) => PvTemplate::WithReserves,
            (true, false) => PvTemplate::WithReservesLate,
        }
    }

    /// Phrase that appears in this template's text and in no other.
    pub fn marker(self) -> &'static str {
        match self {
            PvTemplate::Accepted => "sans réserve, les délais contractuels ayant été respectés",
            PvTemplate::AcceptedLate => "sans réserve, malgré le dépassement du délai contractuel",
            PvTemplate::WithReserves => "achevés dans le délai contractuel",
            PvTemplate::WithReservesLate => "achevés hors délai",
        }
    }

    pub fn has_penalty_clause(self) -> bool {
        matches!(self, PvTemplate::AcceptedLate | PvTemplate::WithReservesLate)
    }

    pub const ALL: [PvTemplate; 4] = [
        PvTemplate::Accepted,
        PvTemplate::AcceptedLate,
        PvTemplate::WithReserves,
        PvTemplate::WithReservesLate,
    ];
}

const PV_TITLE: &str = "PROCÈS-VERBAL DE RÉCEPTION DE CHANTIER";

const CONFORMITY: &str = "Les travaux sont jugés conformes au marché et aux règles de l’art.";

const SIGNATURES: &str = "Le présent procès-verbal est établi pour servir et valoir ce que de droit.

Signatures :

Maître d’Ouvrage : _________________________
Maître d’Œuvre : _________________________
Entreprise exécutante : _________________________
Bureau de contrôle (si présent) : _________________________";

/// Everything printed on a PV.
#[derive(Debug, Clone, PartialEq)]
pub struct PvInput {
    pub pv_number: String,
    pub project_name: String,
    pub block_names: Vec<String>,
    pub category_name: Option<String>,
    pub contractor_name: Option<String>,
    pub reception_date: Date,
    pub responsible_parties: Vec<String>,
    pub reserve_titles: Vec<String>,
    pub facts: ReceptionFacts,
}

/// `PV-<project name>-<dd-mm-yyyy>`, with spaces and slashes turned into
/// hyphens.
pub fn pv_number(project_name: &str, date: Date) -> String {
    let name: String = project_name
        .chars()
        .map(|c| if c == ' ' || c == '/' { '-' } else { c })
        .collect();
    format!("PV-{name}-{}", date.format("%d-%m-%Y"))
}

/// `PV-YYYY-MM-NNN` for a single reserve: creation year and month, then the
/// reserve's 1-based position in `reserves` (`000` when it is not listed).
pub fn reserve_pv_number(reserves: &[Reserve], reserve: &Reserve) -> String {
    let position = reserves
        .iter()
        .position(|r| r.id == reserve.id)
        .map_or(0, |i| i + 1);
    format!("PV-{}-{position:03}", reserve.created_at.format("%Y-%m"))
}

fn render_header(input: &PvInput) -> String {
    let date = format_date_fr(input.reception_date);
    let mut lines = vec![
        PV_TITLE.to_string(),
        String::new(),
        format!("ID du PV: {}", input.pv_number),
        format!("Projet: {}", input.project_name),
    ];
    if !input.block_names.is_empty() {
        lines.push(format!("Blocs: {}", input.block_names.join(", ")));
    }
    if let Some(category) = &input.category_name {
        lines.push(format!("Catégorie: {category}"));
    }
    if let Some(contractor) = &input.contractor_name {
        lines.push(format!("Sous-traitant: {contractor}"));
    }
    lines.push(format!("Date de réception: {date}"));
    lines.push(String::new());
    lines.push("PARTIES PRÉSENTES:".to_string());
    if input.responsible_parties.is_empty() {
        lines.push("Non spécifiées".to_string());
    } else {
        lines.extend(input.responsible_parties.iter().map(|p| format!("- {p}")));
    }
    lines.join("\n")
}

fn render_introduction(date: Date) -> String {
    format!(
        "Suite à la visite du chantier effectuée en date du {}, il a été procédé à la vérification des travaux réalisés.\n\
         Après examen des ouvrages et conformément aux dispositions contractuelles, il est constaté ce qui suit :",
        format_date_fr(date)
    )
}

fn render_reserve_list(titles: &[String], timing: &str) -> String {
    let listing = titles
        .iter()
        .map(|t| format!("- {t}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Le Maître d’Ouvrage prononce la réception sous réserve de la levée des points suivants, \
         les travaux ayant été {timing} :\n{listing}\n\
         L’Entreprise s’engage à lever ces réserves dans un délai de {RESERVE_CURE_DAYS} jours à compter de ce jour."
    )
}

fn render_penalty(delay_days: i64) -> String {
    format!(
        "Les travaux ont été exécutés avec retard par rapport au délai contractuel fixé.\n\
         Un retard de {delay_days} jours est constaté.\n\
         Les dispositions contractuelles relatives aux pénalités de retard pourront être appliquées par le Maître d’Ouvrage."
    )
}

fn render_body(template: PvTemplate, input: &PvInput) -> String {
    let mut sections = Vec::new();
    match template {
        PvTemplate::Accepted => sections.push(format!(
            "{CONFORMITY}\nLe Maître d’Ouvrage prononce la réception définitive {}.",
            PvTemplate::Accepted.marker()
        )),
        PvTemplate::AcceptedLate => sections.push(format!(
            "{CONFORMITY}\nLe Maître d’Ouvrage prononce la réception {}.",
            PvTemplate::AcceptedLate.marker()
        )),
        PvTemplate::WithReserves => sections.push(render_reserve_list(
            &input.reserve_titles,
            "achevés dans le délai contractuel",
        )),
        PvTemplate::WithReservesLate => sections.push(render_reserve_list(
            &input.reserve_titles,
            "achevés hors délai",
        )),
    }
    if template.has_penalty_clause() {
        sections.push(render_penalty(input.facts.delay_days));
    }
    sections.join("\n\n")
}

/// Render the PV text. Output depends only on `input` and `generated_at`.
pub fn render_pv(input: &PvInput, generated_at: Timestamp) -> String {
    let template = PvTemplate::select(&input.facts);
    format!(
        "{}\n\n{}\n\n{}\n\n{}\n\nGénéré le {}",
        render_header(input),
        render_introduction(input.reception_date),
        render_body(template, input),
        SIGNATURES,
        format_timestamp_fr(generated_at)
    )
}

// ---------------------------------------------------------------------------
// Reception assembly
// ---------------------------------------------------------------------------

/// Collections a reception reads from.
#[derive(Debug, Clone, Copy)]
pub struct ReceptionContext<'a> {
    pub projects: &'a [Project],
    pub blocks: &'a [Block],
    pub categories: &'a [Category],
    pub contractors: &'a [Contractor],
    pub reserves: &'a [Reserve],
}

/// Build the PV input for a form selection, as of `today`.
pub fn prepare_pv(ctx: &ReceptionContext<'_>, input: &CreateReception, today: Date) -> PvInput {
    let project = find_by_id(ctx.projects, &input.project_id);
    let project_name = project.map_or(lookup::UNKNOWN_PROJECT, |p| p.name.as_str());
    let related = related_reserves(
        ctx.reserves,
        &input.project_id,
        &input.block_ids,
        input.category_id.as_deref(),
    );
    let facts = compute_facts(&related, project.map(|p| p.end_date), today);

    PvInput {
        pv_number: pv_number(project_name, today),
        project_name: project_name.to_string(),
        block_names: input
            .block_ids
            .iter()
            .map(|id| lookup::block_name(ctx.blocks, id).to_string())
            .collect(),
        category_name: input
            .category_id
            .as_deref()
            .map(|id| lookup::category_name(ctx.categories, id).to_string()),
        contractor_name: input
            .contractor_id
            .as_deref()
            .map(|id| lookup::contractor_name(ctx.contractors, id).to_string()),
        reception_date: today,
        responsible_parties: input.responsible_parties.clone(),
        reserve_titles: related.iter().map(|r| r.title.clone()).collect(),
        facts,
    }
}

/// Create the reception record, PV included.
pub fn build_reception(
    ctx: &ReceptionContext<'_>,
    input: &CreateReception,
    id: EntityId,
    now: Timestamp,
) -> Reception {
    let today = now.date_naive();
    let pv = prepare_pv(ctx, input, today);
    let block_id = match input.block_ids.as_slice() {
        [only] => Some(only.clone()),
        _ => None,
    };

    Reception {
        id,
        project_id: input.project_id.clone(),
        block_id,
        category_id: input.category_id.clone(),
        date: today,
        responsible_parties: input.responsible_parties.clone(),
        has_reserves: pv.facts.has_reserves,
        reserve_count: pv.facts.reserve_count,
        is_on_time: pv.facts.is_on_time,
        delay_days: pv.facts.delay_days,
        pv_generated: true,
        pv_number: Some(pv.pv_number.clone()),
        pv_content: render_pv(&pv, now),
        created_at: now,
    }
}

/// Newest first.
pub fn sort_receptions(receptions: &mut [&Reception]) {
    receptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
