use serde::Serialize;

pub const COLUMN_COUNT: usize = 17;
pub const OUTPUT_COLUMN_COUNT: usize = 14;

/// Columns of the raw booking grid, in the order the report lays them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    SerialNumber,
    BookingNumber,
    AcceptDate,
    RideDate,
    Driver,
    LicensePlate,
    PickupAddress,
    DestinationDuration,
    Bonus,
    NetAmount,
    NetAmountWaitingTime,
    NetAmountAdditionalKm,
    Blank1,
    TotalNetAmount,
    Blank2,
    VatSalesTax,
    GrossTotalAmount,
}

impl Column {
    pub const ALL: [Self; COLUMN_COUNT] = [
        Self::SerialNumber,
        Self::BookingNumber,
        Self::AcceptDate,
        Self::RideDate,
        Self::Driver,
        Self::LicensePlate,
        Self::PickupAddress,
        Self::DestinationDuration,
        Self::Bonus,
        Self::NetAmount,
        Self::NetAmountWaitingTime,
        Self::NetAmountAdditionalKm,
        Self::Blank1,
        Self::TotalNetAmount,
        Self::Blank2,
        Self::VatSalesTax,
        Self::GrossTotalAmount,
    ];

    /// Fields whose text may wrap onto continuation lines.
    pub const TEXT: [Self; 6] = [
        Self::AcceptDate,
        Self::RideDate,
        Self::Driver,
        Self::LicensePlate,
        Self::PickupAddress,
        Self::DestinationDuration,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SerialNumber => "s_no",
            Self::BookingNumber => "booking_number",
            Self::AcceptDate => "accept_date",
            Self::RideDate => "ride_date",
            Self::Driver => "driver",
            Self::LicensePlate => "license_plate",
            Self::PickupAddress => "pickup_address",
            Self::DestinationDuration => "destination_duration",
            Self::Bonus => "bonus",
            Self::NetAmount => "net_amount",
            Self::NetAmountWaitingTime => "net_amount_waiting_time",
            Self::NetAmountAdditionalKm => "net_amount_additional_km",
            Self::Blank1 => "b1",
            Self::TotalNetAmount => "total_net_amount",
            Self::Blank2 => "b2",
            Self::VatSalesTax => "VAT_sales_tax",
            Self::GrossTotalAmount => "gross_total_amount",
        }
    }
}

pub const OUTPUT_COLUMNS: [&str; OUTPUT_COLUMN_COUNT] = [
    "booking_number",
    "accept_date",
    "ride_date",
    "driver",
    "license_plate",
    "pickup_address",
    "destination_duration",
    "bonus",
    "net_amount",
    "net_amount_waiting_time",
    "net_amount_additional_km",
    "total_net_amount",
    "VAT_sales_tax",
    "gross_total_amount",
];

/// One physical line of a booking table, exactly one cell per [`Column`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    cells: [String; COLUMN_COUNT],
}

impl RawRow {
    #[must_use]
    pub fn get(&self, column: Column) -> &str {
        &self.cells[column.index()]
    }

    pub fn get_mut(&mut self, column: Column) -> &mut String {
        &mut self.cells[column.index()]
    }

    fn take(&mut self, column: Column) -> String {
        std::mem::take(self.get_mut(column))
    }
}

impl TryFrom<Vec<String>> for RawRow {
    /// The offending cell count.
    type Error = usize;

    fn try_from(cells: Vec<String>) -> Result<Self, Self::Error> {
        let cells: [String; COLUMN_COUNT] = cells
            .try_into()
            .map_err(|cells: Vec<String>| cells.len())?;
        Ok(Self { cells })
    }
}

impl<const N: usize> TryFrom<[&str; N]> for RawRow {
    type Error = usize;

    fn try_from(cells: [&str; N]) -> Result<Self, Self::Error> {
        Self::try_from(cells.map(str::to_string).to_vec())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct BookingRecord {
    pub booking_number: String,
    pub accept_date: String,
    pub ride_date: String,
    pub driver: String,
    pub license_plate: String,
    pub pickup_address: String,
    pub destination_duration: String,
    pub bonus: String,
    pub net_amount: String,
    pub net_amount_waiting_time: String,
    pub net_amount_additional_km: String,
    pub total_net_amount: String,
    #[serde(rename = "VAT_sales_tax")]
    pub vat_sales_tax: String,
    pub gross_total_amount: String,
}

impl BookingRecord {
    /// Builds the output record from a reconstructed primary row. Serial
    /// number and the two separator columns are dropped here.
    pub(crate) fn from_primary_row(mut row: RawRow) -> Self {
        let license_plate = row
            .get(Column::LicensePlate)
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect();

        Self {
            booking_number: row.take(Column::BookingNumber),
            accept_date: row.take(Column::AcceptDate),
            ride_date: row.take(Column::RideDate),
            driver: row.take(Column::Driver),
            license_plate,
            pickup_address: row.take(Column::PickupAddress),
            destination_duration: row.take(Column::DestinationDuration),
            bonus: row.take(Column::Bonus),
            net_amount: row.take(Column::NetAmount),
            net_amount_waiting_time: row.take(Column::NetAmountWaitingTime),
            net_amount_additional_km: row.take(Column::NetAmountAdditionalKm),
            total_net_amount: row.take(Column::TotalNetAmount),
            vat_sales_tax: row.take(Column::VatSalesTax),
            gross_total_amount: row.take(Column::GrossTotalAmount),
        }
    }

    /// Field values in [`OUTPUT_COLUMNS`] order.
    #[must_use]
    pub fn values(&self) -> [&str; OUTPUT_COLUMN_COUNT] {
        [
            &self.booking_number,
            &self.accept_date,
            &self.ride_date,
            &self.driver,
            &self.license_plate,
            &self.pickup_address,
            &self.destination_duration,
            &self.bonus,
            &self.net_amount,
            &self.net_amount_waiting_time,
            &self.net_amount_additional_km,
            &self.total_net_amount,
            &self.vat_sales_tax,
            &self.gross_total_amount,
        ]
    }

    pub(crate) fn amounts_mut(&mut self) -> [&mut String; 6] {
        [
            &mut self.net_amount,
            &mut self.net_amount_waiting_time,
            &mut self.net_amount_additional_km,
            &mut self.total_net_amount,
            &mut self.vat_sales_tax,
            &mut self.gross_total_amount,
        ]
    }
}
