//! Debug panel binding scene-node properties to sliders
//!
//! Bindings are declared once at bootstrap with [`GuiPanel::add_control`]
//! and drawn every frame by [`GuiPanel::show`]. Edits are written straight
//! into the scene on the event-loop thread, clamped to the declared range.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::{Result, SceneError};
use crate::scene::{Scene, SceneNode};

/// Title of the egui window hosting the sliders
pub const PANEL_TITLE: &str = "Controls";

/// Editable scalar on a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyPath {
    Intensity,
    PositionX,
    PositionY,
    PositionZ,
}

impl PropertyPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyPath::Intensity => "intensity",
            PropertyPath::PositionX => "position.x",
            PropertyPath::PositionY => "position.y",
            PropertyPath::PositionZ => "position.z",
        }
    }

    fn get(&self, node: &SceneNode) -> Option<f32> {
        match self {
            PropertyPath::Intensity => node.light.map(|light| light.intensity),
            PropertyPath::PositionX => Some(node.transform.position.x),
            PropertyPath::PositionY => Some(node.transform.position.y),
            PropertyPath::PositionZ => Some(node.transform.position.z),
        }
    }

    fn slot<'a>(&self, node: &'a mut SceneNode) -> Option<&'a mut f32> {
        match self {
            PropertyPath::Intensity => node.light.as_mut().map(|light| &mut light.intensity),
            PropertyPath::PositionX => Some(&mut node.transform.position.x),
            PropertyPath::PositionY => Some(&mut node.transform.position.y),
            PropertyPath::PositionZ => Some(&mut node.transform.position.z),
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyPath {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "intensity" => Ok(PropertyPath::Intensity),
            "position.x" => Ok(PropertyPath::PositionX),
            "position.y" => Ok(PropertyPath::PositionY),
            "position.z" => Ok(PropertyPath::PositionZ),
            other => Err(format!("unknown property path '{}'", other)),
        }
    }
}

/// One slider: a named node, one of its properties and the allowed range
#[derive(Debug, Clone, PartialEq)]
pub struct GuiControl {
    pub target: String,
    pub property: PropertyPath,
    pub min: f32,
    pub max: f32,
}

impl GuiControl {
    pub fn label(&self) -> String {
        format!("{} {}", self.target, self.property)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GuiPanel {
    controls: Vec<GuiControl>,
}

impl GuiPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `property` of the node named `target` to a slider over `[min, max]`
    ///
    /// The node itself is resolved lazily, each time the panel is drawn.
    pub fn add_control(&mut self, target: impl Into<String>, property: PropertyPath, min: f32, max: f32) -> Result<()> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(SceneError::InvalidControlRange { min, max });
        }

        let control = GuiControl {
            target: target.into(),
            property,
            min,
            max,
        };
        debug!("gui control '{}' in [{}, {}]", control.label(), min, max);
        self.controls.push(control);
        Ok(())
    }

    pub fn controls(&self) -> &[GuiControl] {
        &self.controls
    }

    /// Current value of a bound property
    pub fn read(scene: &Scene, control: &GuiControl) -> Result<f32> {
        let node = scene.get_by_name(&control.target)?;
        control.property.get(node).ok_or_else(|| SceneError::MissingProperty {
            node: control.target.clone(),
            property: control.property.as_str(),
        })
    }

    /// Write a value clamped to the control's range; returns what was stored
    pub fn write(scene: &mut Scene, control: &GuiControl, value: f32) -> Result<f32> {
        let node = scene.get_by_name_mut(&control.target)?;
        let slot = control.property.slot(node).ok_or_else(|| SceneError::MissingProperty {
            node: control.target.clone(),
            property: control.property.as_str(),
        })?;

        let clamped = value.clamp(control.min, control.max);
        *slot = clamped;
        Ok(clamped)
    }

    /// Draw every binding as a slider and apply the user's edits
    pub fn show(&self, ctx: &egui::Context, scene: &mut Scene) -> Result<()> {
        let mut outcome = Ok(());

        egui::Window::new(PANEL_TITLE)
            .resizable(false)
            .default_pos(egui::pos2(10.0, 80.0))
            .show(ctx, |ui| {
                for control in &self.controls {
                    let mut value = match Self::read(scene, control) {
                        Ok(value) => value,
                        Err(err) => {
                            outcome = Err(err);
                            return;
                        }
                    };

                    let slider = egui::Slider::new(&mut value, control.min..=control.max).text(control.label());
                    if ui.add(slider).changed() {
                        if let Err(err) = Self::write(scene, control, value) {
                            outcome = Err(err);
                            return;
                        }
                    }
                }
            });

        outcome
    }
}
