//! DS3231 real-time clock (I2C)
//!
//! Time is kept in BCD registers at 0x00-0x06. The hour register can be in
//! 12- or 24-hour mode depending on whoever set the clock last, so both are
//! decoded. The oscillator-stop flag in the status register is set on first
//! power-up and after the backup battery ran out; readings are rejected
//! until the time is set again.

use embedded_hal::i2c::I2c;
use wordclock_core::time::Timestamp;
use wordclock_core::traits::{ClockError, ClockSource};

/// Fixed 7-bit bus address
pub const ADDRESS: u8 = 0x68;

/// DS3231 register addresses
pub mod reg {
    pub const SECONDS: u8 = 0x00;
    pub const MINUTES: u8 = 0x01;
    pub const HOURS: u8 = 0x02;
    pub const WEEKDAY: u8 = 0x03;
    pub const DATE: u8 = 0x04;
    pub const MONTH: u8 = 0x05;
    pub const YEAR: u8 = 0x06;
    pub const CONTROL: u8 = 0x0E;
    pub const STATUS: u8 = 0x0F;
}

/// Oscillator-stop flag in STATUS
const OSF: u8 = 1 << 7;
/// 12-hour mode select in HOURS
const MODE_12H: u8 = 1 << 6;
/// PM flag in HOURS (12-hour mode)
const PM: u8 = 1 << 5;
/// Century flag in MONTH
const CENTURY: u8 = 1 << 7;

/// DS3231 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C transfer failed
    Bus(E),
    /// Oscillator stopped since the time was last set
    OscillatorStopped,
    /// Registers hold a value outside the calendar
    InvalidReading,
    /// Date/time passed to `set_datetime` is out of range
    InvalidInput,
}

/// Full calendar reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// 2000-2199
    pub year: u16,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    /// 1-7, user-defined start of week
    pub weekday: u8,
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
}

impl DateTime {
    fn is_valid(&self) -> bool {
        (2000..2200).contains(&self.year)
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
            && (1..=7).contains(&self.weekday)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    /// The fields the clock face uses
    pub fn timestamp(&self) -> Option<Timestamp> {
        Timestamp::new(self.hour, self.minute, self.month, self.day).ok()
    }
}

fn bcd_to_bin(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

fn bin_to_bcd(bin: u8) -> u8 {
    ((bin / 10) << 4) | (bin % 10)
}

/// Decode the HOURS register in either mode
fn decode_hour(raw: u8) -> u8 {
    if raw & MODE_12H != 0 {
        let hour = bcd_to_bin(raw & 0x1F) % 12;
        if raw & PM != 0 {
            hour + 12
        } else {
            hour
        }
    } else {
        bcd_to_bin(raw & 0x3F)
    }
}

/// DS3231 driver
pub struct Ds3231<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Check the oscillator-stop flag
    pub fn oscillator_stopped(&mut self) -> Result<bool, Error<I2C::Error>> {
        let mut status = [0u8];
        self.i2c
            .write_read(ADDRESS, &[reg::STATUS], &mut status)
            .map_err(Error::Bus)?;
        Ok(status[0] & OSF != 0)
    }

    /// Read the full date and time
    pub fn datetime(&mut self) -> Result<DateTime, Error<I2C::Error>> {
        if self.oscillator_stopped()? {
            return Err(Error::OscillatorStopped);
        }

        let mut raw = [0u8; 7];
        self.i2c
            .write_read(ADDRESS, &[reg::SECONDS], &mut raw)
            .map_err(Error::Bus)?;

        let century = if raw[5] & CENTURY != 0 { 100 } else { 0 };
        let dt = DateTime {
            second: bcd_to_bin(raw[0] & 0x7F),
            minute: bcd_to_bin(raw[1] & 0x7F),
            hour: decode_hour(raw[2]),
            weekday: raw[3] & 0x07,
            day: bcd_to_bin(raw[4] & 0x3F),
            month: bcd_to_bin(raw[5] & 0x1F),
            year: 2000 + century + u16::from(bcd_to_bin(raw[6])),
        };
        if !dt.is_valid() {
            return Err(Error::InvalidReading);
        }
        Ok(dt)
    }

    /// Set the date and time in 24-hour mode and restart the oscillator flag
    pub fn set_datetime(&mut self, dt: &DateTime) -> Result<(), Error<I2C::Error>> {
        if !dt.is_valid() {
            return Err(Error::InvalidInput);
        }

        let years = dt.year - 2000;
        let century = if years >= 100 { CENTURY } else { 0 };
        let frame = [
            reg::SECONDS,
            bin_to_bcd(dt.second),
            bin_to_bcd(dt.minute),
            bin_to_bcd(dt.hour),
            dt.weekday,
            bin_to_bcd(dt.day),
            bin_to_bcd(dt.month) | century,
            bin_to_bcd((years % 100) as u8),
        ];
        self.i2c.write(ADDRESS, &frame).map_err(Error::Bus)?;

        let mut status = [0u8];
        self.i2c
            .write_read(ADDRESS, &[reg::STATUS], &mut status)
            .map_err(Error::Bus)?;
        self.i2c
            .write(ADDRESS, &[reg::STATUS, status[0] & !OSF])
            .map_err(Error::Bus)
    }
}

impl<I2C: I2c> ClockSource for Ds3231<I2C> {
    fn now(&mut self) -> Result<Timestamp, ClockError> {
        let dt = self.datetime().map_err(|e| match e {
            Error::Bus(_) => ClockError::Bus,
            Error::OscillatorStopped => ClockError::NotRunning,
            Error::InvalidReading | Error::InvalidInput => ClockError::InvalidReading,
        })?;
        dt.timestamp().ok_or(ClockError::InvalidReading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Register file behind a fake bus, with auto-incrementing pointer
    struct MockBus {
        regs: [u8; 0x13],
        pointer: usize,
        fail: bool,
    }

    impl MockBus {
        fn new() -> Self {
            Self {
                regs: [0; 0x13],
                pointer: 0,
                fail: false,
            }
        }

        fn with_time(raw: [u8; 7]) -> Self {
            let mut bus = Self::new();
            bus.regs[..7].copy_from_slice(&raw);
            bus
        }
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), ErrorKind> {
            if self.fail || address != ADDRESS {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((&first, rest)) = bytes.split_first() {
                            self.pointer = first as usize;
                            for &b in rest {
                                self.regs[self.pointer] = b;
                                self.pointer += 1;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for b in buf.iter_mut() {
                            *b = self.regs[self.pointer];
                            self.pointer += 1;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_bcd() {
        assert_eq!(bcd_to_bin(0x59), 59);
        assert_eq!(bin_to_bcd(37), 0x37);
        assert_eq!(bcd_to_bin(bin_to_bcd(23)), 23);
    }

    #[test]
    fn test_decode_hour_modes() {
        assert_eq!(decode_hour(0x16), 16);
        assert_eq!(decode_hour(0x00), 0);
        // 12-hour mode
        assert_eq!(decode_hour(MODE_12H | 0x12), 0);
        assert_eq!(decode_hour(MODE_12H | PM | 0x12), 12);
        assert_eq!(decode_hour(MODE_12H | PM | 0x04), 16);
        assert_eq!(decode_hour(MODE_12H | 0x11), 11);
    }

    #[test]
    fn test_read_24h() {
        // 2024-02-02 16:37:05
        let bus = MockBus::with_time([0x05, 0x37, 0x16, 0x05, 0x02, 0x02, 0x24]);
        let mut rtc = Ds3231::new(bus);

        let dt = rtc.datetime().unwrap();
        assert_eq!(dt.year, 2024);
        assert_eq!((dt.hour, dt.minute, dt.second), (16, 37, 5));

        let ts = rtc.now().unwrap();
        assert_eq!(ts, Timestamp::new(16, 37, 2, 2).unwrap());
    }

    #[test]
    fn test_read_12h_pm() {
        let bus = MockBus::with_time([0x00, 0x15, MODE_12H | PM | 0x09, 0x01, 0x25, 0x12, 0x23]);
        let mut rtc = Ds3231::new(bus);
        assert_eq!(rtc.now(), Ok(Timestamp::new(21, 15, 12, 25).unwrap()));
    }

    #[test]
    fn test_oscillator_stopped() {
        let mut bus = MockBus::with_time([0x00, 0x00, 0x12, 0x01, 0x01, 0x01, 0x24]);
        bus.regs[reg::STATUS as usize] = OSF;
        let mut rtc = Ds3231::new(bus);
        assert_eq!(rtc.now(), Err(ClockError::NotRunning));
    }

    #[test]
    fn test_invalid_reading() {
        // month 0x13
        let bus = MockBus::with_time([0x00, 0x00, 0x12, 0x01, 0x01, 0x13, 0x24]);
        let mut rtc = Ds3231::new(bus);
        assert_eq!(rtc.datetime(), Err(Error::InvalidReading));
        assert_eq!(rtc.now(), Err(ClockError::InvalidReading));
    }

    #[test]
    fn test_bus_error() {
        let mut bus = MockBus::new();
        bus.fail = true;
        let mut rtc = Ds3231::new(bus);
        assert_eq!(rtc.now(), Err(ClockError::Bus));
    }

    #[test]
    fn test_set_datetime_clears_osf() {
        let mut bus = MockBus::new();
        bus.regs[reg::STATUS as usize] = OSF | 0x08;
        let mut rtc = Ds3231::new(bus);

        let dt = DateTime {
            year: 2125,
            month: 2,
            day: 2,
            weekday: 7,
            hour: 23,
            minute: 59,
            second: 30,
        };
        rtc.set_datetime(&dt).unwrap();
        assert_eq!(rtc.datetime(), Ok(dt));

        let bus = rtc.release();
        assert_eq!(bus.regs[reg::HOURS as usize], 0x23);
        assert_eq!(bus.regs[reg::MONTH as usize], CENTURY | 0x02);
        assert_eq!(bus.regs[reg::STATUS as usize], 0x08);
    }

    #[test]
    fn test_set_datetime_rejects_out_of_range() {
        let mut rtc = Ds3231::new(MockBus::new());
        let dt = DateTime {
            year: 2024,
            month: 2,
            day: 30,
            weekday: 0,
            hour: 12,
            minute: 0,
            second: 0,
        };
        assert_eq!(rtc.set_datetime(&dt), Err(Error::InvalidInput));
    }
}
