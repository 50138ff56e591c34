/// Retained display tree : two long lived scene containers, each owning an
/// ordered list of visual children. Generic over the texture handle so the
/// browser can store `HtmlImageElement`s while tests store plain markers.
///
/// ┌──────────── Stage ─────────────┐
/// │ loading : Container (alpha)    │
/// │   ├─ Text  "Loading..."        │
/// │   └─ Text  "42%"               │
/// │ game    : Container (alpha)    │
/// │   └─ Sprite (texture, anchor)  │
/// └────────────────────────────────┘

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Loading,
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }
}

/// Animatable property addressed by tweens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    SceneAlpha(SceneId),
    Alpha(NodeId),
    X(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: u32,
    pub fill: u32,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font_family: "Arial".to_string(),
            font_size: 36,
            fill: 0xffffff,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Visual<T> {
    /// anchor is a fraction of the texture size, 0.5 centers it on position
    Sprite { texture: T, anchor: f64 },
    Text { content: String, style: TextStyle },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayObject<T> {
    pub id: NodeId,
    pub position: Point,
    pub alpha: f64,
    pub visual: Visual<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Container<T> {
    pub alpha: f64,
    pub children: Vec<DisplayObject<T>>,
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Container {
            alpha: 1.0,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage<T> {
    loading: Container<T>,
    game: Container<T>,
    next_id: u32,
}

impl<T> Default for Stage<T> {
    fn default() -> Self {
        Stage {
            loading: Container::default(),
            game: Container::default(),
            next_id: 0,
        }
    }
}

impl<T> Stage<T> {
    pub fn new() -> Self {
        Stage::default()
    }

    pub fn scene(&self, id: SceneId) -> &Container<T> {
        match id {
            SceneId::Loading => &self.loading,
            SceneId::Game => &self.game,
        }
    }

    fn scene_mut(&mut self, id: SceneId) -> &mut Container<T> {
        match id {
            SceneId::Loading => &mut self.loading,
            SceneId::Game => &mut self.game,
        }
    }

    /// Containers in draw order : background -> foreground
    pub fn scenes(&self) -> [&Container<T>; 2] {
        [&self.loading, &self.game]
    }

    pub fn add(&mut self, scene: SceneId, position: Point, visual: Visual<T>) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.scene_mut(scene).children.push(DisplayObject {
            id,
            position,
            alpha: 1.0,
            visual,
        });
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&DisplayObject<T>> {
        self.scenes()
            .into_iter()
            .flat_map(|scene| scene.children.iter())
            .find(|node| node.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut DisplayObject<T>> {
        self.loading
            .children
            .iter_mut()
            .chain(self.game.children.iter_mut())
            .find(|node| node.id == id)
    }

    /// Returns false when the target no longer exists (e.g. scene cleared)
    pub fn set(&mut self, target: Target, value: f64) -> bool {
        match target {
            Target::SceneAlpha(scene) => {
                self.scene_mut(scene).alpha = value.clamp(0.0, 1.0);
                true
            }
            Target::Alpha(id) => match self.node_mut(id) {
                Some(node) => {
                    node.alpha = value.clamp(0.0, 1.0);
                    true
                }
                None => false,
            },
            Target::X(id) => match self.node_mut(id) {
                Some(node) => {
                    node.position.x = value;
                    true
                }
                None => false,
            },
        }
    }

    pub fn get(&self, target: Target) -> Option<f64> {
        match target {
            Target::SceneAlpha(scene) => Some(self.scene(scene).alpha),
            Target::Alpha(id) => self.node(id).map(|node| node.alpha),
            Target::X(id) => self.node(id).map(|node| node.position.x),
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        match self.node_mut(id) {
            Some(DisplayObject {
                visual: Visual::Text { content, .. },
                ..
            }) => {
                content.clear();
                content.push_str(text);
                true
            }
            _ => false,
        }
    }

    /// Drop every child of a scene, returning how many were removed
    pub fn clear(&mut self, scene: SceneId) -> usize {
        let children = &mut self.scene_mut(scene).children;
        let removed = children.len();
        children.clear();
        removed
    }
}
