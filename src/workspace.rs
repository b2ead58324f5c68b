use crate::layout::Layout;
use crate::window::Client;
use x11rb::protocol::xproto::Window;

/// One virtual desktop: an ordered window list plus the layout that places it.
///
/// List order is stacking and tab order. The last window is the tiling
/// master, so the most recently mapped window always takes the master slot.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub name: String,
    pub layout: Layout,
    pub windows: Vec<Client>,
}

impl Workspace {
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            layout,
            windows: Vec::new(),
        }
    }

    pub fn append(&mut self, client: Client) {
        self.windows.push(client);
    }

    /// Removes the window at `index`, shifting the rest down.
    ///
    /// Must stay order preserving: a swap-remove would hand the master slot
    /// to whatever window happened to be in front.
    pub fn remove(&mut self, index: usize) -> Option<Client> {
        if index < self.windows.len() {
            Some(self.windows.remove(index))
        } else {
            None
        }
    }

    pub fn find(&self, window: Window) -> Option<usize> {
        self.windows.iter().position(|c| c.id == window)
    }

    pub fn contains(&self, window: Window) -> bool {
        self.find(window).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&Client> {
        self.windows.get(index)
    }

    pub fn last(&self) -> Option<&Client> {
        self.windows.last()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Flag a window as gone. It keeps its slot until the next [`compact`].
    ///
    /// [`compact`]: Workspace::compact
    pub fn mark_killed(&mut self, window: Window) -> bool {
        match self.windows.iter_mut().find(|c| c.id == window) {
            Some(client) => {
                client.is_killed = true;
                true
            }
            None => false,
        }
    }

    /// Drop every killed window, keeping the order of the survivors.
    pub fn compact(&mut self) -> usize {
        let before = self.windows.len();
        self.windows.retain(|c| !c.is_killed);
        before - self.windows.len()
    }
}
