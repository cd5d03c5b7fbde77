use roomsync_serde::{PacketReader, PacketWriter, Serde, SerdeErr};

use crate::{
    model::{furni::ItemType, item_data::ItemData},
    types::{ItemId, UserId},
};

/// One inventory item staged in a trade offer
#[derive(Clone, Debug, PartialEq)]
pub struct TradeItem {
    pub item_id: ItemId,
    pub item_type: ItemType,
    pub furni_id: ItemId,
    pub kind: i32,
    pub category: i32,
    pub groupable: bool,
    pub data: ItemData,
    pub creation_day: i32,
    pub creation_month: i32,
    pub creation_year: i32,
    /// Only sent for floor items
    pub extra: i64,
}

impl Serde for TradeItem {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_legacy_long(self.item_id);
        writer.write_string(match self.item_type {
            ItemType::Floor => "S",
            ItemType::Wall => "I",
        });
        writer.write_legacy_long(self.furni_id);
        writer.write_i32(self.kind);
        writer.write_i32(self.category);
        writer.write_bool(self.groupable);
        self.data.ser(writer);
        writer.write_i32(self.creation_day);
        writer.write_i32(self.creation_month);
        writer.write_i32(self.creation_year);
        if self.item_type == ItemType::Floor {
            writer.write_legacy_long(self.extra);
        }
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let item_id = reader.read_legacy_long()?;
        let type_text = reader.read_string()?;
        let item_type = match type_text.as_str() {
            "S" | "s" => ItemType::Floor,
            "I" | "i" => ItemType::Wall,
            _ => {
                return Err(SerdeErr::InvalidFormat {
                    field: "trade item type",
                    text: type_text,
                })
            }
        };

        let furni_id = reader.read_legacy_long()?;
        let kind = reader.read_i32()?;
        let category = reader.read_i32()?;
        let groupable = reader.read_bool()?;
        let data = ItemData::de(reader)?;
        let creation_day = reader.read_i32()?;
        let creation_month = reader.read_i32()?;
        let creation_year = reader.read_i32()?;
        let extra = if item_type == ItemType::Floor {
            reader.read_legacy_long()?
        } else {
            0
        };

        Ok(Self {
            item_id,
            item_type,
            furni_id,
            kind,
            category,
            groupable,
            data,
            creation_day,
            creation_month,
            creation_year,
            extra,
        })
    }
}

/// One party's side of a trade
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TradeOffer {
    pub user_id: UserId,
    pub items: Vec<TradeItem>,
    pub furni_count: i32,
    pub credit_count: i32,
}

impl Serde for TradeOffer {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_legacy_long(self.user_id);
        writer.write_int_count(self.items.len());
        for item in &self.items {
            item.ser(writer);
        }
        writer.write_i32(self.furni_count);
        writer.write_i32(self.credit_count);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let user_id = reader.read_legacy_long()?;
        let count = reader.read_int_count()?;
        let mut items = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            items.push(TradeItem::de(reader)?);
        }
        Ok(Self {
            user_id,
            items,
            furni_count: reader.read_i32()?,
            credit_count: reader.read_i32()?,
        })
    }
}
