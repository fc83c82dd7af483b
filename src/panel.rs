//! The closed set of panels this crate can drive

use core::str::FromStr;

use crate::epd1in54_v2::Epd1in54;
use crate::epd2in13_v2::Epd2in13;
use crate::epd2in9_v2::Epd2in9;
use crate::error::{Error, ErrorKind};
use crate::graphics::DisplayGeometry;
use crate::traits::{HardwareTransport, PanelDriver, UpdateMode};

/// A supported panel, selected by its vendor driver name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// 2.13" V2, 122x250
    Epd2in13V2(Epd2in13),
    /// 2.9" V2, 128x296
    Epd2in9V2(Epd2in9),
    /// 1.54" V2, 200x200
    Epd1in54V2(Epd1in54),
}

impl Panel {
    /// Vendor driver names, as accepted by [`FromStr`]
    pub const NAMES: [&'static str; 3] = ["epd2in13_V2", "epd2in9_V2", "epd1in54_V2"];

    /// Vendor driver name of the panel
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Epd2in13V2(_) => Self::NAMES[0],
            Panel::Epd2in9V2(_) => Self::NAMES[1],
            Panel::Epd1in54V2(_) => Self::NAMES[2],
        }
    }
}

impl FromStr for Panel {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "epd2in13_v2" => Ok(Panel::Epd2in13V2(Epd2in13::new())),
            "epd2in9_v2" => Ok(Panel::Epd2in9V2(Epd2in9::new())),
            "epd1in54_v2" => Ok(Panel::Epd1in54V2(Epd1in54::new())),
            _ => Err(Error::DriverUnavailable(name.to_owned())),
        }
    }
}

impl PanelDriver for Panel {
    fn geometry(&self) -> DisplayGeometry {
        match self {
            Panel::Epd2in13V2(epd) => epd.geometry(),
            Panel::Epd2in9V2(epd) => epd.geometry(),
            Panel::Epd1in54V2(epd) => epd.geometry(),
        }
    }

    fn black_plane_command(&self) -> u8 {
        match self {
            Panel::Epd2in13V2(epd) => epd.black_plane_command(),
            Panel::Epd2in9V2(epd) => epd.black_plane_command(),
            Panel::Epd1in54V2(epd) => epd.black_plane_command(),
        }
    }

    fn red_plane_command(&self) -> u8 {
        match self {
            Panel::Epd2in13V2(epd) => epd.red_plane_command(),
            Panel::Epd2in9V2(epd) => epd.red_plane_command(),
            Panel::Epd1in54V2(epd) => epd.red_plane_command(),
        }
    }

    fn init<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
        mode: UpdateMode,
    ) -> Result<(), ErrorKind> {
        match self {
            Panel::Epd2in13V2(epd) => epd.init(transport, mode),
            Panel::Epd2in9V2(epd) => epd.init(transport, mode),
            Panel::Epd1in54V2(epd) => epd.init(transport, mode),
        }
    }

    fn sleep<T: HardwareTransport>(&mut self, transport: &mut T) -> Result<(), ErrorKind> {
        match self {
            Panel::Epd2in13V2(epd) => epd.sleep(transport),
            Panel::Epd2in9V2(epd) => epd.sleep(transport),
            Panel::Epd1in54V2(epd) => epd.sleep(transport),
        }
    }

    fn turn_on_display<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), ErrorKind> {
        match self {
            Panel::Epd2in13V2(epd) => epd.turn_on_display(transport),
            Panel::Epd2in9V2(epd) => epd.turn_on_display(transport),
            Panel::Epd1in54V2(epd) => epd.turn_on_display(transport),
        }
    }

    fn turn_on_display_part<T: HardwareTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), ErrorKind> {
        match self {
            Panel::Epd2in13V2(epd) => epd.turn_on_display_part(transport),
            Panel::Epd2in9V2(epd) => epd.turn_on_display_part(transport),
            Panel::Epd1in54V2(epd) => epd.turn_on_display_part(transport),
        }
    }
}
