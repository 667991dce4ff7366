//! Sentiment signal aggregation
//!
//! Turns insider trades and news labels into two sub-verdicts and combines
//! them into one signal. Confidences stay in `[0, 1]` here; they become
//! whole percentages only when a report is rendered.

use crate::api::{InsiderTrade, NewsItem, NewsSentiment};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional trading signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// Expect the price to rise
    Bullish,
    /// Expect the price to fall
    Bearish,
    /// No majority either way
    Neutral,
}

impl Signal {
    /// Majority vote; ties are neutral
    pub fn majority(bullish: usize, bearish: usize) -> Self {
        match bullish.cmp(&bearish) {
            std::cmp::Ordering::Greater => Self::Bullish,
            std::cmp::Ordering::Less => Self::Bearish,
            std::cmp::Ordering::Equal => Self::Neutral,
        }
    }

    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round a `[0, 1]` confidence to a whole percentage
pub fn to_percent(confidence: f64) -> u32 {
    (confidence * 100.0).round().clamp(0.0, 100.0) as u32
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// One half of the sentiment verdict
#[derive(Debug, Clone, PartialEq)]
pub struct SubVerdict {
    /// Direction
    pub signal: Signal,
    /// Strength in `[0, 1]`
    pub confidence: f64,
    /// Human-readable tally or failure reason
    pub reasoning: String,
}

/// Insider trade tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsiderTally {
    /// Purchases
    pub bullish: usize,
    /// Sales
    pub bearish: usize,
}

impl InsiderTally {
    /// Count trades; absent and zero share counts are skipped
    pub fn from_trades(trades: &[InsiderTrade]) -> Self {
        trades
            .iter()
            .filter_map(|t| t.transaction_shares)
            .filter(|&shares| shares != 0.0 && !shares.is_nan())
            .fold(Self::default(), |mut tally, shares| {
                if shares < 0.0 {
                    tally.bearish += 1;
                } else {
                    tally.bullish += 1;
                }
                tally
            })
    }

    /// Counted trades
    pub fn total(&self) -> usize {
        self.bullish + self.bearish
    }

    /// Sub-verdict for these counts
    pub fn verdict(&self) -> SubVerdict {
        SubVerdict {
            signal: Signal::majority(self.bullish, self.bearish),
            confidence: ratio(self.bullish.max(self.bearish), self.total()),
            reasoning: format!(
                "Bullish signals: {}, Bearish signals: {}",
                self.bullish, self.bearish
            ),
        }
    }
}

/// News label tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewsTally {
    /// Positive records
    pub positive: usize,
    /// Neutral, unlabelled or unrecognized records
    pub neutral: usize,
    /// Negative records
    pub negative: usize,
}

impl NewsTally {
    /// Count records by normalised label
    pub fn from_news(news: &[NewsItem]) -> Self {
        news.iter().fold(Self::default(), |mut tally, item| {
            match item.sentiment() {
                NewsSentiment::Positive => tally.positive += 1,
                NewsSentiment::Neutral => tally.neutral += 1,
                NewsSentiment::Negative => tally.negative += 1,
            }
            tally
        })
    }

    /// Counted records
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Sub-verdict for these counts
    pub fn verdict(&self) -> SubVerdict {
        let largest = self.positive.max(self.neutral).max(self.negative);
        SubVerdict {
            signal: Signal::majority(self.positive, self.negative),
            confidence: ratio(largest, self.total()),
            reasoning: format!(
                "Positive: {}, Neutral: {}, Negative: {}",
                self.positive, self.neutral, self.negative
            ),
        }
    }
}

/// Insider sub-verdict
pub fn insider_verdict(trades: &[InsiderTrade]) -> SubVerdict {
    InsiderTally::from_trades(trades).verdict()
}

/// News sub-verdict from a fetch outcome
///
/// A failed fetch yields `(neutral, 0)` with the failure in the reasoning.
pub fn news_verdict<E: fmt::Display>(fetched: &Result<Vec<NewsItem>, E>) -> SubVerdict {
    match fetched {
        Ok(news) => NewsTally::from_news(news).verdict(),
        Err(e) => SubVerdict {
            signal: Signal::Neutral,
            confidence: 0.0,
            reasoning: format!("Error fetching news sentiment: {e}"),
        },
    }
}

/// Combined sentiment verdict
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentReport {
    /// Overall direction
    pub signal: Signal,
    /// Mean of the sub-verdict confidences, in `[0, 1]`
    pub confidence: f64,
    /// Insider sub-verdict
    pub insider: SubVerdict,
    /// News sub-verdict
    pub news: SubVerdict,
}

/// Combine the two sub-verdicts
pub fn combine(insider: SubVerdict, news: SubVerdict) -> SentimentReport {
    let votes = [insider.signal, news.signal];
    let bullish = votes.iter().filter(|&&s| s == Signal::Bullish).count();
    let bearish = votes.iter().filter(|&&s| s == Signal::Bearish).count();

    SentimentReport {
        signal: Signal::majority(bullish, bearish),
        confidence: (insider.confidence + news.confidence) / 2.0,
        insider,
        news,
    }
}

#[derive(Serialize)]
struct RenderedVerdict<'a> {
    signal: Signal,
    confidence: String,
    reasoning: &'a str,
}

impl<'a> From<&'a SubVerdict> for RenderedVerdict<'a> {
    fn from(verdict: &'a SubVerdict) -> Self {
        Self {
            signal: verdict.signal,
            confidence: format!("{}%", to_percent(verdict.confidence)),
            reasoning: &verdict.reasoning,
        }
    }
}

#[derive(Serialize)]
struct RenderedReasoning<'a> {
    insider_analysis: RenderedVerdict<'a>,
    news_analysis: RenderedVerdict<'a>,
}

#[derive(Serialize)]
struct RenderedReport<'a> {
    signal: Signal,
    confidence: String,
    reasoning: RenderedReasoning<'a>,
}

impl SentimentReport {
    /// Overall confidence as a whole percentage
    pub fn percent(&self) -> u32 {
        let mean = (self.insider.confidence * 100.0 + self.news.confidence * 100.0) / 2.0;
        mean.round().clamp(0.0, 100.0) as u32
    }

    /// Message content: compact JSON with percentages
    pub fn to_content(&self) -> serde_json::Result<String> {
        serde_json::to_string(&RenderedReport {
            signal: self.signal,
            confidence: format!("{}%", self.percent()),
            reasoning: RenderedReasoning {
                insider_analysis: (&self.insider).into(),
                news_analysis: (&self.news).into(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn trades(shares: &[Option<f64>]) -> Vec<InsiderTrade> {
        shares.iter().map(|&s| InsiderTrade::with_shares(s)).collect()
    }

    fn news(labels: &[Option<&str>]) -> Vec<NewsItem> {
        labels.iter().map(|&l| NewsItem::with_sentiment(l)).collect()
    }

    #[test]
    fn test_mixed_insider_trades() {
        let verdict = insider_verdict(&trades(&[Some(100.0), Some(-50.0), Some(30.0)]));

        assert_eq!(verdict.signal, Signal::Bullish);
        assert!((verdict.confidence - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(to_percent(verdict.confidence), 67);
        assert_eq!(verdict.reasoning, "Bullish signals: 2, Bearish signals: 1");
    }

    #[test]
    fn test_insider_skips_absent_and_zero() {
        let tally = InsiderTally::from_trades(&trades(&[None, Some(0.0), Some(-10.0), None]));
        assert_eq!(tally, InsiderTally { bullish: 0, bearish: 1 });
        assert_eq!(tally.verdict().signal, Signal::Bearish);
        assert!((tally.verdict().confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_insider_law_over_generated_sets() {
        // Small LCG so the sets are varied but reproducible
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = move || {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            seed >> 33
        };

        for _ in 0..200 {
            let len = (next() % 12) as usize;
            let shares: Vec<Option<f64>> = (0..len)
                .map(|_| match next() % 4 {
                    0 => None,
                    1 => Some(-((next() % 5000) as f64) - 1.0),
                    _ => Some((next() % 5000) as f64 + 1.0),
                })
                .collect();
            let bullish = shares.iter().flatten().filter(|&&s| s > 0.0).count();
            let bearish = shares.iter().flatten().filter(|&&s| s < 0.0).count();

            let verdict = insider_verdict(&trades(&shares));

            let expected = if bullish > bearish {
                Signal::Bullish
            } else if bearish > bullish {
                Signal::Bearish
            } else {
                Signal::Neutral
            };
            assert_eq!(verdict.signal, expected, "shares: {shares:?}");
            let total = bullish + bearish;
            if total == 0 {
                assert!(verdict.confidence.abs() < f64::EPSILON);
            } else {
                let want = bullish.max(bearish) as f64 / total as f64;
                assert!((verdict.confidence - want).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_news_tally_counts_unknown_as_neutral() {
        let fetched: Result<_, String> = Ok(news(&[
            Some("positive"),
            Some("positive"),
            Some("negative"),
            None,
            Some("mixed"),
        ]));
        let verdict = news_verdict(&fetched);

        assert_eq!(verdict.signal, Signal::Bullish);
        assert!((verdict.confidence - 0.4).abs() < 1e-9);
        assert_eq!(verdict.reasoning, "Positive: 2, Neutral: 2, Negative: 1");
    }

    #[test]
    fn test_news_confidence_uses_neutral_majority() {
        let fetched: Result<_, String> =
            Ok(news(&[Some("neutral"), Some("neutral"), Some("neutral"), Some("negative")]));
        let verdict = news_verdict(&fetched);

        assert_eq!(verdict.signal, Signal::Bearish);
        assert!((verdict.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_news_fetch_failure_is_neutral_zero() {
        let fetched: Result<Vec<NewsItem>, _> = Err("API error: 503");
        let verdict = news_verdict(&fetched);

        assert_eq!(verdict.signal, Signal::Neutral);
        assert!(verdict.confidence.abs() < f64::EPSILON);
        assert_eq!(verdict.reasoning, "Error fetching news sentiment: API error: 503");
    }

    #[test]
    fn test_empty_inputs_are_neutral_zero() {
        let fetched: Result<Vec<NewsItem>, String> = Ok(Vec::new());
        let report = combine(insider_verdict(&[]), news_verdict(&fetched));

        assert_eq!(report.signal, Signal::Neutral);
        assert_eq!(report.percent(), 0);
    }

    #[test]
    fn test_combination_majority() {
        let sub = |signal, confidence| SubVerdict {
            signal,
            confidence,
            reasoning: String::new(),
        };

        let cases = [
            (Signal::Bullish, Signal::Bullish, Signal::Bullish),
            (Signal::Bullish, Signal::Neutral, Signal::Bullish),
            (Signal::Neutral, Signal::Bearish, Signal::Bearish),
            (Signal::Bullish, Signal::Bearish, Signal::Neutral),
            (Signal::Neutral, Signal::Neutral, Signal::Neutral),
        ];
        for (insider, news, expected) in cases {
            assert_eq!(combine(sub(insider, 0.5), sub(news, 0.5)).signal, expected);
        }
    }

    #[test]
    fn test_overall_percent_rounding() {
        let sub = |confidence| SubVerdict {
            signal: Signal::Neutral,
            confidence,
            reasoning: String::new(),
        };

        for (a, b, want) in [
            (2.0 / 3.0, 0.0, 33),
            (2.0 / 3.0, 0.4, 53),
            (0.005, 0.0, 0),
            (1.0, 1.0, 100),
            (0.25, 0.5, 38),
        ] {
            let report = combine(sub(a), sub(b));
            assert_eq!(report.percent(), want, "a={a} b={b}");
            assert!((report.confidence - (a + b) / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_content_shape() {
        let fetched: Result<Vec<NewsItem>, &str> = Err("timeout");
        let report = combine(
            insider_verdict(&trades(&[Some(100.0), Some(-50.0), Some(30.0)])),
            news_verdict(&fetched),
        );
        let content: Value = serde_json::from_str(&report.to_content().unwrap()).unwrap();

        assert_eq!(
            content,
            json!({
                "signal": "bullish",
                "confidence": "33%",
                "reasoning": {
                    "insider_analysis": {
                        "signal": "bullish",
                        "confidence": "67%",
                        "reasoning": "Bullish signals: 2, Bearish signals: 1"
                    },
                    "news_analysis": {
                        "signal": "neutral",
                        "confidence": "0%",
                        "reasoning": "Error fetching news sentiment: timeout"
                    }
                }
            })
        );
    }
}
