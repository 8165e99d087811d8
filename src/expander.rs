use crate::models::{Playlist, Segment};
use crate::queue::SegmentQueue;

/// Flattens a playlist into countdown segments: each interval becomes its
/// activity segment, followed by a "Rest" segment when it declares one.
pub struct IntervalExpander {
    playlist: Playlist,
    queue: SegmentQueue<Segment>,
}

impl IntervalExpander {
    pub fn new(playlist: Playlist) -> Self {
        let queue = build_queue(&playlist);
        Self { playlist, queue }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current(&self) -> Option<&Segment> {
        self.queue.peek()
    }

    /// Drops the current segment and returns the one after it.
    pub fn next(&mut self) -> Option<&Segment> {
        self.queue.dequeue();
        self.queue.peek()
    }

    pub fn has_next(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Rebuilds the queue from the stored playlist.
    pub fn reset(&mut self) {
        self.queue = build_queue(&self.playlist);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Segments still queued, current one included.
    pub fn upcoming(&self) -> impl Iterator<Item = &Segment> {
        self.queue.iter()
    }
}

fn build_queue(playlist: &Playlist) -> SegmentQueue<Segment> {
    let mut queue = SegmentQueue::new();
    for interval in &playlist.intervals {
        queue.enqueue(Segment::from(interval));
        if let Some(rest) = interval.rest {
            queue.enqueue(Segment::rest(rest));
        }
    }
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Interval;

    fn sample_playlist() -> Playlist {
        Playlist::new(
            "98342",
            vec![
                Interval::new("Workout 1", 30).with_rest(10),
                Interval::new("Workout 2", 10),
            ],
        )
    }

    #[test]
    fn test_expands_rest_after_its_interval() {
        let expander = IntervalExpander::new(sample_playlist());
        let segments: Vec<Segment> = expander.upcoming().cloned().collect();

        assert_eq!(
            segments,
            vec![
                Segment::new("Workout 1", 30),
                Segment::new("Rest", 10),
                Segment::new("Workout 2", 10),
            ]
        );
    }

    #[test]
    fn test_expanded_length_bounds() {
        let playlist = Playlist::new(
            "mixed",
            vec![
                Interval::new("A", 5).with_rest(1),
                Interval::new("B", 5),
                Interval::new("C", 5).with_rest(2),
                Interval::new("D", 5),
            ],
        );
        let n = playlist.intervals.len();
        let expander = IntervalExpander::new(playlist);

        assert_eq!(expander.len(), 6);
        assert!(expander.len() >= n && expander.len() <= 2 * n);
        let names: Vec<&str> = expander.upcoming().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Rest", "B", "C", "Rest", "D"]);
    }

    #[test]
    fn test_current_is_first_interval() {
        let expander = IntervalExpander::new(sample_playlist());
        assert_eq!(expander.current(), Some(&Segment::new("Workout 1", 30)));
    }

    #[test]
    fn test_next_returns_new_current() {
        let mut expander = IntervalExpander::new(sample_playlist());
        let next = expander.next().cloned();

        assert_eq!(next, Some(Segment::new("Rest", 10)));
        assert_eq!(expander.current(), Some(&Segment::new("Rest", 10)));
    }

    #[test]
    fn test_has_next_until_exhausted() {
        let mut expander = IntervalExpander::new(sample_playlist());
        assert!(expander.has_next());

        expander.next();
        expander.next();
        assert!(expander.has_next());
        assert_eq!(expander.next(), None);
        assert!(!expander.has_next());

        // Stepping past the end stays empty.
        assert_eq!(expander.next(), None);
        assert_eq!(expander.current(), None);
    }

    #[test]
    fn test_reset_restores_original_order() {
        let mut expander = IntervalExpander::new(sample_playlist());
        expander.next();
        expander.next();
        expander.next();
        expander.reset();

        assert_eq!(expander.current(), Some(&Segment::new("Workout 1", 30)));
        assert_eq!(expander.len(), 3);
        assert_eq!(expander.next(), Some(&Segment::new("Rest", 10)));
    }

    #[test]
    fn test_empty_playlist() {
        let mut expander = IntervalExpander::new(Playlist::new("empty", vec![]));
        assert_eq!(expander.current(), None);
        assert!(!expander.has_next());
        expander.reset();
        assert_eq!(expander.current(), None);
    }
}
