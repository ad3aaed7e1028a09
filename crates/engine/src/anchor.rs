use decor_core::{DayKey, Decoration, DecorationId, Point, Rect};

/// Screen rectangle of one visible calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: DayKey,
    pub rect: Rect,
}

impl DayCell {
    pub fn new(date: impl Into<String>, rect: Rect) -> Self {
        Self {
            date: DayKey::new(date),
            rect,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DayCellMap {
    cells: Vec<DayCell>,
}

impl DayCellMap {
    pub fn new(cells: Vec<DayCell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn rect_of(&self, date: &DayKey) -> Option<&Rect> {
        self.cells.iter().find(|c| &c.date == date).map(|c| &c.rect)
    }

    /// Cell whose centroid is closest to `point`. With `within` set, only
    /// cells whose rectangle inflated by that distance contains the point are
    /// candidates.
    pub fn nearest(&self, point: Point, within: Option<f64>) -> Option<&DayCell> {
        self.cells
            .iter()
            .filter(|c| within.is_none_or(|d| c.rect.inflate(d).contains(point)))
            .min_by(|a, b| {
                let da = a.rect.center().distance_squared(point);
                let db = b.rect.center().distance_squared(point);
                da.total_cmp(&db)
            })
    }

    /// New positions for anchored decorations whose day is visible and whose
    /// projected position differs from the stored one.
    pub fn reproject(&self, decorations: &[Decoration]) -> Vec<(DecorationId, Point)> {
        decorations
            .iter()
            .filter_map(|d| {
                let anchor = d.anchor.as_ref()?;
                let rect = self.rect_of(&anchor.date)?;
                let projected = anchor.project(rect);
                (projected != d.position()).then_some((d.id, projected))
            })
            .collect()
    }
}
