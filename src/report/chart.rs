//! Terminal histograms.
//!
//! One row per bin: the bin's lower edge, a bar proportional to its height,
//! and the count. With an overlay (theoretical density evaluated at the bin
//! centers) the bars show density instead of counts and a `*` marks where
//! the overlay lies on each row.

use std::fmt;

use crate::histogram::Histogram;

const BAR: char = '#';
const MARK: char = '*';
/// Columns taken by the tallest bar.
const WIDTH: usize = 50;

/// Histogram rendered as text.
pub struct TextHistogram<'a> {
    title: &'a str,
    hist: &'a Histogram,
    overlay: Option<&'a [f64]>,
}

impl<'a> TextHistogram<'a> {
    pub fn new(title: &'a str, hist: &'a Histogram) -> Self {
        Self {
            title,
            hist,
            overlay: None,
        }
    }

    /// Draws `values` (one per bin, density units) over the bars. Ignored
    /// if the length does not match the number of bins.
    pub fn with_overlay(mut self, values: &'a [f64]) -> Self {
        if values.len() == self.hist.n_bins() {
            self.overlay = Some(values);
        }
        self
    }

    /// Bar length and optional marker column for each bin.
    fn rows(&self) -> Vec<(usize, Option<usize>)> {
        let heights: Vec<f64> = match self.overlay {
            Some(_) => self.hist.density(),
            None => self.hist.counts.iter().map(|&c| c as f64).collect(),
        };
        let overlay = self.overlay.unwrap_or(&[]);
        let top = heights
            .iter()
            .chain(overlay.iter())
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        let scale = |v: f64| -> usize {
            if top <= 0.0 || !v.is_finite() {
                0
            } else {
                ((v / top) * WIDTH as f64).round() as usize
            }
        };

        heights
            .iter()
            .enumerate()
            .map(|(i, &h)| (scale(h), overlay.get(i).map(|&o| scale(o))))
            .collect()
    }
}

impl fmt::Display for TextHistogram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for ((bar, mark), (edge, count)) in self
            .rows()
            .into_iter()
            .zip(self.hist.edges.iter().zip(&self.hist.counts))
        {
            let len = mark.map_or(bar, |m| bar.max(m + 1));
            let line: String = (0..len)
                .map(|i| match mark {
                    Some(m) if m == i => MARK,
                    _ if i < bar => BAR,
                    _ => ' ',
                })
                .collect();
            writeln!(f, "{edge:>9.2} | {line:<w$} {count}", w = WIDTH + 1)?;
        }
        Ok(())
    }
}
