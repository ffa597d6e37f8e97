//! Controller selections and the scene directory they are resolved against
//!
//! Three selections drive the rotator: the local controller on the host
//! object, the remote object, and the remote controller on that object.
//! Every setter reports the changes it made so the host can re-resolve its
//! bindings without polling.

use tracing::debug;

use crate::orient::Pose;

/// Read access to the host's scene graph
pub trait SceneDirectory {
    /// Names of every object in the scene, in display order
    fn objects(&self) -> Vec<String>;

    /// Controller names of `object` in display order, `None` if the object
    /// does not exist
    fn controllers(&self, object: &str) -> Option<Vec<String>>;

    /// Current world pose of a controller, `None` if either name is unknown
    fn controller_pose(&self, object: &str, controller: &str) -> Option<Pose>;
}

/// A single selection that changed, with its new value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    LocalController(Option<String>),
    RemoteObject(Option<String>),
    RemoteController(Option<String>),
}

impl SelectionChange {
    /// Whether the change affects which controller is being rotated
    pub fn affects_local(&self) -> bool {
        matches!(self, SelectionChange::LocalController(_))
    }

    /// Whether the change affects which controller is being looked at
    pub fn affects_remote(&self) -> bool {
        !self.affects_local()
    }
}

/// Current selections of one rotator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    host_object: String,
    local_controller: Option<String>,
    remote_object: Option<String>,
    remote_controller: Option<String>,
}

impl Selections {
    /// Empty selections for a rotator living on `host_object`
    pub fn new(host_object: impl Into<String>) -> Self {
        Self {
            host_object: host_object.into(),
            ..Default::default()
        }
    }

    /// Restore previously saved selections without validating them.
    ///
    /// Stale names are harmless: they simply fail to resolve.
    pub fn restore(
        host_object: impl Into<String>,
        local_controller: Option<String>,
        remote_object: Option<String>,
        remote_controller: Option<String>,
    ) -> Self {
        Self {
            host_object: host_object.into(),
            local_controller,
            remote_object,
            remote_controller,
        }
    }

    pub fn host_object(&self) -> &str {
        &self.host_object
    }

    pub fn local_controller(&self) -> Option<&str> {
        self.local_controller.as_deref()
    }

    pub fn remote_object(&self) -> Option<&str> {
        self.remote_object.as_deref()
    }

    pub fn remote_controller(&self) -> Option<&str> {
        self.remote_controller.as_deref()
    }

    /// Choices for the local controller: controllers of the host object
    pub fn local_choices(&self, directory: &dyn SceneDirectory) -> Vec<String> {
        directory
            .controllers(&self.host_object)
            .unwrap_or_default()
    }

    /// Choices for the remote object: every object in the scene
    pub fn remote_object_choices(&self, directory: &dyn SceneDirectory) -> Vec<String> {
        directory.objects()
    }

    /// Choices for the remote controller, empty until a remote object is set
    pub fn remote_controller_choices(&self, directory: &dyn SceneDirectory) -> Vec<String> {
        self.remote_object
            .as_deref()
            .and_then(|object| directory.controllers(object))
            .unwrap_or_default()
    }

    /// Select the first controller of the host object if nothing is selected yet
    pub fn select_default_local(&mut self, directory: &dyn SceneDirectory) -> Vec<SelectionChange> {
        if self.local_controller.is_some() {
            return Vec::new();
        }
        match self.local_choices(directory).into_iter().next() {
            Some(first) => self.set_local_controller(first),
            None => Vec::new(),
        }
    }

    pub fn set_local_controller(&mut self, name: impl Into<String>) -> Vec<SelectionChange> {
        let name = name.into();
        if self.local_controller.as_deref() == Some(name.as_str()) {
            return Vec::new();
        }
        debug!(host = %self.host_object, controller = %name, "Local controller selected");
        self.local_controller = Some(name.clone());
        vec![SelectionChange::LocalController(Some(name))]
    }

    /// Select the remote object and re-resolve the remote controller against it.
    ///
    /// The remote controller is kept if the new object has one of the same
    /// name. Otherwise it is cleared, unless the new object has exactly one
    /// controller, in which case that one is selected.
    pub fn set_remote_object(
        &mut self,
        directory: &dyn SceneDirectory,
        name: impl Into<String>,
    ) -> Vec<SelectionChange> {
        let name = name.into();
        if self.remote_object.as_deref() == Some(name.as_str()) {
            return Vec::new();
        }
        debug!(host = %self.host_object, object = %name, "Remote object selected");
        self.remote_object = Some(name.clone());
        let mut changes = vec![SelectionChange::RemoteObject(Some(name))];

        let choices = self.remote_controller_choices(directory);
        let still_valid = self
            .remote_controller
            .as_ref()
            .is_some_and(|current| choices.contains(current));

        let next = if choices.len() == 1 {
            choices.into_iter().next()
        } else if still_valid {
            self.remote_controller.clone()
        } else {
            None
        };

        if still_valid && next == self.remote_controller {
            // Same name, different object: the binding still moved
            changes.push(SelectionChange::RemoteController(next));
        } else if next != self.remote_controller {
            if let Some(controller) = &next {
                debug!(host = %self.host_object, controller = %controller, "Remote controller auto-selected");
            }
            self.remote_controller = next.clone();
            changes.push(SelectionChange::RemoteController(next));
        }
        changes
    }

    pub fn set_remote_controller(&mut self, name: impl Into<String>) -> Vec<SelectionChange> {
        let name = name.into();
        if self.remote_controller.as_deref() == Some(name.as_str()) {
            return Vec::new();
        }
        debug!(host = %self.host_object, controller = %name, "Remote controller selected");
        self.remote_controller = Some(name.clone());
        vec![SelectionChange::RemoteController(Some(name))]
    }

    /// `(object, controller)` of the controller being rotated
    pub fn local_binding(&self) -> Option<(&str, &str)> {
        self.local_controller
            .as_deref()
            .map(|controller| (self.host_object.as_str(), controller))
    }

    /// `(object, controller)` of the controller being looked at
    pub fn remote_binding(&self) -> Option<(&str, &str)> {
        match (&self.remote_object, &self.remote_controller) {
            (Some(object), Some(controller)) => Some((object.as_str(), controller.as_str())),
            _ => None,
        }
    }

    pub fn resolve_local(&self, directory: &dyn SceneDirectory) -> Option<Pose> {
        let (object, controller) = self.local_binding()?;
        directory.controller_pose(object, controller)
    }

    pub fn resolve_remote(&self, directory: &dyn SceneDirectory) -> Option<Pose> {
        let (object, controller) = self.remote_binding()?;
        directory.controller_pose(object, controller)
    }
}

/// Scene directory backed by plain vectors.
///
/// Objects and controllers keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    objects: Vec<(String, Vec<(String, Pose)>)>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object with its controllers, replacing any object of that name
    pub fn with_object<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        controllers: impl IntoIterator<Item = (S, Pose)>,
    ) -> Self {
        self.insert_object(name, controllers);
        self
    }

    pub fn insert_object<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        controllers: impl IntoIterator<Item = (S, Pose)>,
    ) {
        let name = name.into();
        let controllers = controllers
            .into_iter()
            .map(|(controller, pose)| (controller.into(), pose))
            .collect();
        match self.objects.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = controllers,
            None => self.objects.push((name, controllers)),
        }
    }

    pub fn remove_object(&mut self, name: &str) {
        self.objects.retain(|(existing, _)| existing != name);
    }

    /// Move a controller; returns false if it does not exist
    pub fn set_pose(&mut self, object: &str, controller: &str, pose: Pose) -> bool {
        let slot = self
            .objects
            .iter_mut()
            .find(|(name, _)| name == object)
            .and_then(|(_, controllers)| controllers.iter_mut().find(|(name, _)| name == controller));
        match slot {
            Some((_, existing)) => {
                *existing = pose;
                true
            }
            None => false,
        }
    }

    fn object(&self, name: &str) -> Option<&[(String, Pose)]> {
        self.objects
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, controllers)| controllers.as_slice())
    }
}

impl SceneDirectory for MemoryDirectory {
    fn objects(&self) -> Vec<String> {
        self.objects.iter().map(|(name, _)| name.clone()).collect()
    }

    fn controllers(&self, object: &str) -> Option<Vec<String>> {
        self.object(object)
            .map(|controllers| controllers.iter().map(|(name, _)| name.clone()).collect())
    }

    fn controller_pose(&self, object: &str, controller: &str) -> Option<Pose> {
        self.object(object)?
            .iter()
            .find(|(name, _)| name == controller)
            .map(|(_, pose)| *pose)
    }
}
