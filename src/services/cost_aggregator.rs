use crate::models::{
    itinerary::{EntryKind, ItineraryEntry},
    tour_plan::CostSummary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CostBucket {
    Transport,
    Accommodation,
    Food,
    Other,
}

impl From<EntryKind> for CostBucket {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Transport => CostBucket::Transport,
            EntryKind::Hotel => CostBucket::Accommodation,
            EntryKind::Food => CostBucket::Food,
            EntryKind::HistoricalAttraction
            | EntryKind::HillyAttraction
            | EntryKind::EntertainmentAttraction
            | EntryKind::GenericAttraction => CostBucket::Other,
        }
    }
}

pub struct CostAggregator;

impl CostAggregator {
    /// Sum entry costs into the fixed taxonomy. The total is derived from the
    /// buckets and never estimated on its own.
    pub fn aggregate(entries: &[ItineraryEntry]) -> CostSummary {
        let mut summary = CostSummary::default();

        for entry in entries {
            let bucket = match CostBucket::from(entry.kind) {
                CostBucket::Transport => &mut summary.transport_cost,
                CostBucket::Accommodation => &mut summary.accommodation_cost,
                CostBucket::Food => &mut summary.food_cost,
                CostBucket::Other => &mut summary.other_cost,
            };
            *bucket += entry.estimated_cost;
        }

        summary.total_cost = summary.transport_cost
            + summary.accommodation_cost
            + summary.food_cost
            + summary.other_cost;
        summary
    }
}
