//! Campaign and business-card queries.

use super::{
    from_epoch, to_epoch, AlertStore, BusinessCardRow, CampaignRow, CampaignStatus,
};
use crate::error::AlertResult;
use rusqlite::{params, OptionalExtension};

impl AlertStore {
    pub fn insert_business_card(&self, row: &BusinessCardRow) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO business_card (card_id, business_name) VALUES (?1, ?2)",
            params![row.card_id, row.business_name],
        )?;
        Ok(())
    }

    pub fn business_card(&self, card_id: &str) -> AlertResult<Option<BusinessCardRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT card_id, business_name FROM business_card WHERE card_id = ?1",
                params![card_id],
                |r| {
                    Ok(BusinessCardRow {
                        card_id: r.get(0)?,
                        business_name: r.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn delete_business_card(&self, card_id: &str) -> AlertResult<()> {
        self.conn.execute(
            "DELETE FROM business_card WHERE card_id = ?1",
            params![card_id],
        )?;
        Ok(())
    }

    pub fn insert_campaign(&self, row: &CampaignRow) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO campaign (
                 campaign_id, business_card_id, status, contracted_views, bonus_views,
                 total_views, amount_paid, paid_at, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                row.campaign_id,
                row.business_card_id,
                row.status.as_str(),
                row.contracted_views,
                row.bonus_views,
                row.total_views,
                row.amount_paid,
                row.paid_at.map(to_epoch),
                to_epoch(row.created_at),
            ],
        )?;
        Ok(())
    }

    /// Written by the expiration job; the alert engine only reads status.
    pub fn update_campaign_status(
        &self,
        campaign_id: &str,
        status: CampaignStatus,
    ) -> AlertResult<()> {
        self.conn.execute(
            "UPDATE campaign SET status = ?1 WHERE campaign_id = ?2",
            params![status.as_str(), campaign_id],
        )?;
        Ok(())
    }

    pub fn update_campaign_views(&self, campaign_id: &str, total_views: i64) -> AlertResult<()> {
        self.conn.execute(
            "UPDATE campaign SET total_views = ?1 WHERE campaign_id = ?2",
            params![total_views, campaign_id],
        )?;
        Ok(())
    }

    pub fn active_campaigns(&self) -> AlertResult<Vec<CampaignRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT campaign_id, business_card_id, status, contracted_views, bonus_views,
                    total_views, amount_paid, paid_at, created_at
             FROM campaign
             WHERE status = 'active'
             ORDER BY created_at, campaign_id",
        )?;
        let raw = stmt
            .query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, Option<String>>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, i64>(3)?,
                    r.get::<_, i64>(4)?,
                    r.get::<_, i64>(5)?,
                    r.get::<_, f64>(6)?,
                    r.get::<_, Option<i64>>(7)?,
                    r.get::<_, i64>(8)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(
                |(id, card, status, contracted, bonus, total, paid, paid_at, created)|
                 -> AlertResult<CampaignRow> {
                    Ok(CampaignRow {
                        campaign_id: id,
                        business_card_id: card,
                        status: status.parse()?,
                        contracted_views: contracted,
                        bonus_views: bonus,
                        total_views: total,
                        amount_paid: paid,
                        paid_at: paid_at.map(from_epoch),
                        created_at: from_epoch(created),
                    })
                },
            )
            .collect()
    }
}
