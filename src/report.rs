use crate::expander::IntervalExpander;
use crate::models::Playlist;
use crate::utils::{format_clock, format_duration};

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub segments: usize,
    pub work_secs: u64,
    pub rest_secs: u64,
}

impl PlaylistSummary {
    pub fn total_secs(&self) -> u64 {
        self.work_secs + self.rest_secs
    }
}

pub fn summarize(playlist: &Playlist) -> PlaylistSummary {
    let expander = IntervalExpander::new(playlist.clone());
    let mut summary = PlaylistSummary::default();

    for segment in expander.upcoming() {
        summary.segments += 1;
        if segment.is_rest() {
            summary.rest_secs += segment.duration;
        } else {
            summary.work_secs += segment.duration;
        }
    }

    summary
}

/// Prints the expanded segment list of a playlist with start offsets.
pub struct Reporter;

impl Reporter {
    pub fn report(playlist: &Playlist) {
        print!("{}", Self::render(playlist));
    }

    pub fn render(playlist: &Playlist) -> String {
        let expander = IntervalExpander::new(playlist.clone());
        let summary = summarize(playlist);
        let mut out = String::new();

        let title = format!("Playlist: {}", playlist.id);
        out.push_str(&format!("{}\n{}\n", title, "=".repeat(title.len())));

        if summary.segments == 0 {
            out.push_str("No intervals.\n");
            return out;
        }

        let mut offset = 0;
        for (idx, segment) in expander.upcoming().enumerate() {
            out.push_str(&format!(
                "{:>3}. [{}] {:<24} {}\n",
                idx + 1,
                format_clock(offset),
                segment.name,
                format_duration(segment.duration)
            ));
            offset += segment.duration;
        }

        out.push('\n');
        out.push_str(&format!("Segments: {}\n", summary.segments));
        out.push_str(&format!("Work:     {}\n", format_duration(summary.work_secs)));
        out.push_str(&format!("Rest:     {}\n", format_duration(summary.rest_secs)));
        out.push_str(&format!("Total:    {}\n", format_duration(summary.total_secs())));
        out
    }
}
