//! Follow camera for the active vehicle

use servo_math::{Mat4, Vec3};

/// Where the camera sits relative to the vehicle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
    /// Behind and above the vehicle, looking along the free-look direction
    #[default]
    ThirdPerson,
    /// At the driver's eye point, turning with the vehicle
    Cockpit,
}

/// Camera that follows a vehicle's chassis matrix
#[derive(Clone, Debug)]
pub struct CameraRig {
    mode: CameraMode,
    /// Free-look orientation (rotation only)
    orientation: Mat4,
    matrix: Mat4,

    /// Distance behind the follow point in third-person mode
    pub distance: f32,
    /// Height of the follow point above the chassis origin
    pub height_above_head: f32,
    /// Driver eye point in chassis space
    pub eye_point: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            mode: CameraMode::ThirdPerson,
            orientation: Mat4::IDENTITY,
            matrix: Mat4::IDENTITY,
            distance: 8.0,
            height_above_head: 2.0,
            eye_point: Vec3::new(-0.8, 1.5, 0.0),
        }
    }

    /// Builder: set third-person distance
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Builder: set follow point height
    pub fn with_height_above_head(mut self, height: f32) -> Self {
        self.height_above_head = height;
        self
    }

    /// Builder: set cockpit eye point
    pub fn with_eye_point(mut self, eye_point: Vec3) -> Self {
        self.eye_point = eye_point;
        self
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
    }

    /// Select cockpit or third-person mode
    pub fn set_cockpit(&mut self, cockpit: bool) {
        self.mode = if cockpit { CameraMode::Cockpit } else { CameraMode::ThirdPerson };
    }

    /// Set the free-look angles (radians)
    pub fn set_look(&mut self, yaw: f32, pitch: f32) {
        self.orientation = Mat4::roll(pitch) * Mat4::yaw(yaw);
    }

    /// Camera matrix from the last update
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Place the camera for a vehicle at `player`
    pub fn update(&mut self, player: &Mat4) -> Mat4 {
        self.matrix = match self.mode {
            CameraMode::ThirdPerson => {
                let target = player.transform_vector(Vec3::new(0.0, self.height_above_head, 0.0));
                self.orientation
                    .with_posit(target - self.orientation.front * self.distance)
            }
            CameraMode::Cockpit => {
                let rotated = self.orientation * *player;
                rotated.with_posit(player.transform_vector(self.eye_point))
            }
        };
        self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_third_person_sits_behind_follow_point() {
        let mut rig = CameraRig::new();
        let player = Mat4::from_translation(Vec3::new(5.0, 1.5, 0.0));
        let camera = rig.update(&player);
        // Default look is along +X, so the camera sits 8 units toward -X
        assert!(camera.posit.approx_eq(Vec3::new(-3.0, 3.5, 0.0), EPSILON), "got {:?}", camera.posit);
        assert!(camera.front.approx_eq(Vec3::X, EPSILON));
    }

    #[test]
    fn test_third_person_ignores_vehicle_heading() {
        let mut rig = CameraRig::new();
        let player = Mat4::yaw(1.0).with_posit(Vec3::ZERO);
        let camera = rig.update(&player);
        assert!(camera.front.approx_eq(Vec3::X, EPSILON));
    }

    #[test]
    fn test_cockpit_turns_with_vehicle() {
        let mut rig = CameraRig::new();
        rig.set_cockpit(true);
        let player = Mat4::yaw(std::f32::consts::FRAC_PI_2).with_posit(Vec3::new(1.0, 0.0, 0.0));
        let camera = rig.update(&player);

        assert!(camera.front.approx_eq(player.front, EPSILON));
        let eye = player.transform_vector(Vec3::new(-0.8, 1.5, 0.0));
        assert!(camera.posit.approx_eq(eye, EPSILON));
    }

    #[test]
    fn test_mode_switch() {
        let mut rig = CameraRig::new();
        assert_eq!(rig.mode(), CameraMode::ThirdPerson);
        rig.set_cockpit(true);
        assert_eq!(rig.mode(), CameraMode::Cockpit);
    }
}
