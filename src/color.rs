//! Colors

/// Convert an f64 [0,1] component to a u8 [0,255] component
pub fn cu8(v: f64) -> u8 {
    (v * 255.0).round() as u8
}

/// Color with components in [0,1] and 8-bit accessors
pub trait Color {
    /// Red in [0,1]
    fn red(&self) -> f64;
    /// Green in [0,1]
    fn green(&self) -> f64;
    /// Blue in [0,1]
    fn blue(&self) -> f64;
    /// Alpha in [0,1]
    fn alpha(&self) -> f64;
    fn red8(&self) -> u8 {
        cu8(self.red())
    }
    fn green8(&self) -> u8 {
        cu8(self.green())
    }
    fn blue8(&self) -> u8 {
        cu8(self.blue())
    }
    fn alpha8(&self) -> u8 {
        cu8(self.alpha())
    }
    fn is_transparent(&self) -> bool {
        self.alpha() == 0.0
    }
    fn is_opaque(&self) -> bool {
        self.alpha() >= 1.0
    }
}

/// Color as red, green, blue, and alpha
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba8 { r, g, b, a }
    }
    /// White color (255,255,255,255)
    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
    /// Black color (0,0,0,255)
    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
    pub fn from_color<C: Color>(c: &C) -> Self {
        Self::new(c.red8(), c.green8(), c.blue8(), c.alpha8())
    }
}

impl Color for Rgba8 {
    fn red(&self) -> f64 {
        f64::from(self.r) / 255.0
    }
    fn green(&self) -> f64 {
        f64::from(self.g) / 255.0
    }
    fn blue(&self) -> f64 {
        f64::from(self.b) / 255.0
    }
    fn alpha(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
    fn red8(&self) -> u8 {
        self.r
    }
    fn green8(&self) -> u8 {
        self.g
    }
    fn blue8(&self) -> u8 {
        self.b
    }
    fn alpha8(&self) -> u8 {
        self.a
    }
}

/// Color as red, green, and blue, fully opaque
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb8 { r, g, b }
    }
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

impl Color for Rgb8 {
    fn red(&self) -> f64 {
        f64::from(self.r) / 255.0
    }
    fn green(&self) -> f64 {
        f64::from(self.g) / 255.0
    }
    fn blue(&self) -> f64 {
        f64::from(self.b) / 255.0
    }
    fn alpha(&self) -> f64 {
        1.0
    }
    fn red8(&self) -> u8 {
        self.r
    }
    fn green8(&self) -> u8 {
        self.g
    }
    fn blue8(&self) -> u8 {
        self.b
    }
    fn alpha8(&self) -> u8 {
        255
    }
}
