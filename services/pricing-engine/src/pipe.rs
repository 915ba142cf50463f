//! Raw quote to tiered quote pipeline
//!
//! Polls the RAW_QUOTE stream, applies the tier transform against the
//! published refdata snapshots, and republishes one quote per (tier, rung)
//! on that tier's MARKET_QUOTE stream. Tiers without a cached config are
//! skipped for the rung, never defaulted.

use crate::pricer;
use codec::{decode_frame, Frame, QuoteView, QuoteWriter};
use refdata::TierSnapshots;
use runtime::{RetryingPublisher, Worker};
use transport::Subscription;
use tracing::{debug, warn};
use types::{ClientTierLevel, Rung};

const FRAGMENT_LIMIT: usize = 10;

/// Worker fanning raw quotes out to the per-tier market quote streams
pub struct QuotePricerPipe {
    subscription: Box<dyn Subscription>,
    tier_snapshots: TierSnapshots,
    publishers: [RetryingPublisher; ClientTierLevel::ALL.len()],
    buf: [u8; 128],
    closed: bool,
}

impl QuotePricerPipe {
    /// `publishers` must be ordered by tier index (Bronze first)
    pub fn new(
        subscription: Box<dyn Subscription>,
        tier_snapshots: TierSnapshots,
        publishers: [RetryingPublisher; ClientTierLevel::ALL.len()],
    ) -> Self {
        Self {
            subscription,
            tier_snapshots,
            publishers,
            buf: [0; 128],
            closed: false,
        }
    }
}

fn price_quote(
    view: &QuoteView<'_>,
    tier_snapshots: &TierSnapshots,
    publishers: &mut [RetryingPublisher; ClientTierLevel::ALL.len()],
    buf: &mut [u8],
    closed: &mut bool,
) {
    for level in ClientTierLevel::ALL {
        let Some(tier) = tier_snapshots.get(level.id()) else {
            debug!(tier_id = level.id(), "no tier config cached, skipping");
            continue;
        };
        for rung in view.rungs() {
            let price = pricer::calculate(&tier, &rung);
            let frame_len = {
                let mut writer = match QuoteWriter::begin(
                    buf,
                    0,
                    view.symbol(),
                    view.value_date(),
                    view.tenor(),
                    level.id(),
                    view.price_creation_ts(),
                ) {
                    Ok(writer) => writer,
                    Err(err) => {
                        warn!(error = %err, "tiered quote encode failed");
                        continue;
                    }
                };
                if let Err(err) =
                    writer.add_rung(Rung::new(price.bid, price.ask, rung.volume))
                {
                    warn!(error = %err, "tiered rung encode failed");
                    continue;
                }
                writer.encoded_length()
            };
            match publishers[level.index()].publish(&buf[..frame_len]) {
                Ok(_) => {}
                Err(err) if err.is_transient() => {
                    warn!(tier_id = level.id(), "tiered quote dropped under backpressure");
                }
                Err(err) => {
                    warn!(tier_id = level.id(), error = %err, "tiered quote channel failed");
                    *closed = true;
                    return;
                }
            }
        }
    }
}

impl Worker for QuotePricerPipe {
    fn do_work(&mut self) -> usize {
        if self.closed {
            return 0;
        }
        let Self {
            subscription,
            tier_snapshots,
            publishers,
            buf,
            closed,
        } = self;
        subscription.poll(
            &mut |frame| match decode_frame(frame) {
                Ok(Frame::Quote(view)) => {
                    price_quote(&view, tier_snapshots, publishers, buf, closed)
                }
                Ok(other) => debug!(frame = ?other, "non-quote frame on raw quote stream"),
                Err(err) if err.is_skippable() => {
                    warn!(error = %err, "skipping undecodable raw quote")
                }
                Err(err) => warn!(error = %err, "raw quote decode failed"),
            },
            FRAGMENT_LIMIT,
        )
    }

    fn role_name(&self) -> &str {
        "quote-pricer"
    }

    fn on_close(&mut self) {
        self.subscription.close();
        self.closed = true;
    }
}
