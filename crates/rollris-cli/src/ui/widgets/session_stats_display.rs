use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use rollris_engine::SessionSnapshot;

use crate::{theme, ui::widgets::style};

/// Score, supply, level and best score panel.
pub struct SessionStatsDisplay<'a> {
    snapshot: SessionSnapshot<'a>,
    best_score: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(snapshot: SessionSnapshot<'a>, best_score: usize) -> Self {
        Self {
            snapshot,
            best_score,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        32 + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        ROWS.len() as u16 + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = &'static dyn Fn(&SessionStatsDisplay<'_>) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    LabelValue(&'static str, Value),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|stats| format!("{} rolls", stats.snapshot.score)),
    Row::FullValue(&|stats| theme::supply_text(stats.snapshot.score)),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|stats| stats.snapshot.level.to_string()),
    Row::LabelValue("LINES:", &|stats| {
        stats.snapshot.total_lines_cleared.to_string()
    }),
    Row::LabelValue("NEXT LEVEL IN:", &|stats| {
        stats.snapshot.lines_to_next_level.max(0).to_string()
    }),
    Row::LabelValue("SPEED:", &|stats| {
        format!("{}ms", stats.snapshot.drop_interval.as_millis())
    }),
    Row::Empty,
    Row::LabelValue("YOUR BEST:", &|stats| format!("{} rolls", stats.best_score)),
    Row::FullLabel("RECORD:"),
    Row::FullValue(&|_| theme::RECORD_TEXT.to_owned()),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let label_style = style::ACCENT;
        let value_style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, label_style)
                        .left_aligned()
                        .render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(&self), value_style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, label_style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(&self), value_style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
