use crate::engine::Detection;

/// Detections whose vertical centers are within this many pixels are
/// judged to lie on the same text row.
pub const DEFAULT_LINE_THRESHOLD: f32 = 20.0;

/// A row of text assembled from detections judged vertically aligned.
#[derive(Debug, Clone)]
pub struct Line {
    pub detections: Vec<Detection>,
    /// Mean vertical center of the member detections.
    pub y_center: f32,
}

impl Line {
    /// Fragment texts joined left-to-right with single spaces.
    pub fn text(&self) -> String {
        self.detections
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Ordered line sequence produced by one engine for one image.
#[derive(Debug, Clone)]
pub struct EngineResult {
    pub engine: String,
    pub lines: Vec<Line>,
}

impl EngineResult {
    pub fn new(engine: impl Into<String>, lines: Vec<Line>) -> Self {
        Self { engine: engine.into(), lines }
    }

    pub fn empty(engine: impl Into<String>) -> Self {
        Self::new(engine, Vec::new())
    }

    /// Build from plain text, one single-detection line per text line.
    /// Empty lines are kept so `text()` round-trips the input.
    pub fn from_text(engine: impl Into<String>, text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| Line {
                detections: vec![Detection::from_box(line, 0.0, i as f32 * 40.0, 1000.0, 30.0, None)],
                y_center: i as f32 * 40.0 + 15.0,
            })
            .collect();
        Self::new(engine, lines)
    }

    /// Whether the engine produced any usable text at all.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.text().trim().is_empty())
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Group raw detections into lines by vertical proximity: sort by
/// vertical center, start a new line whenever the next detection's
/// center is more than `threshold` pixels from the last one appended,
/// then order fragments within each line by leftmost x.
pub fn group_into_lines(mut detections: Vec<Detection>, threshold: f32) -> Vec<Line> {
    detections.sort_by(|a, b| a.y_center().total_cmp(&b.y_center()));

    let mut lines: Vec<Line> = Vec::new();
    let mut running_y = f32::NEG_INFINITY;

    for detection in detections {
        let y = detection.y_center();
        match lines.last_mut() {
            Some(line) if (y - running_y).abs() <= threshold => line.detections.push(detection),
            _ => lines.push(Line { detections: vec![detection], y_center: y }),
        }
        running_y = y;
    }

    for line in &mut lines {
        line.detections.sort_by(|a, b| a.x_min().total_cmp(&b.x_min()));
        line.y_center = line.detections.iter().map(Detection::y_center).sum::<f32>()
            / line.detections.len() as f32;
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(text: &str, x: f32, y: f32) -> Detection {
        Detection::from_box(text, x, y, 50.0, 10.0, None)
    }

    #[test]
    fn zero_detections_yield_zero_lines() {
        assert!(group_into_lines(vec![], DEFAULT_LINE_THRESHOLD).is_empty());
    }

    #[test]
    fn close_detections_share_a_line() {
        let lines = group_into_lines(
            vec![det("world", 100.0, 12.0), det("hello", 0.0, 10.0)],
            DEFAULT_LINE_THRESHOLD,
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "hello world");
    }

    #[test]
    fn distant_detections_split_into_lines() {
        let lines = group_into_lines(
            vec![det("second", 0.0, 60.0), det("first", 0.0, 10.0)],
            DEFAULT_LINE_THRESHOLD,
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "first");
        assert_eq!(lines[1].text(), "second");
    }

    #[test]
    fn fragments_are_ordered_by_x_within_a_line() {
        let lines = group_into_lines(
            vec![det("#42", 300.0, 10.0), det("INVOICE", 5.0, 11.0), det("GSTIN", 150.0, 9.0)],
            DEFAULT_LINE_THRESHOLD,
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "INVOICE GSTIN #42");
    }

    #[test]
    fn threshold_is_tunable() {
        let detections = vec![det("a", 0.0, 0.0), det("b", 0.0, 30.0)];
        assert_eq!(group_into_lines(detections.clone(), 20.0).len(), 2);
        assert_eq!(group_into_lines(detections, 35.0).len(), 1);
    }

    #[test]
    fn from_text_round_trips() {
        let r = EngineResult::from_text("mock", "INVOICE\n\nTotal: 100");
        assert_eq!(r.text(), "INVOICE\n\nTotal: 100");
        assert!(!r.is_empty());
    }

    #[test]
    fn whitespace_only_result_counts_as_empty() {
        assert!(EngineResult::from_text("mock", "  \n ").is_empty());
        assert!(EngineResult::empty("mock").is_empty());
    }
}
