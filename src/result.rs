//! The output of a layout pass.

use trellis_core::{
    AnyElement, ElementIdentifier, ElementPath, LayoutAttributes, Point, Rect, RoundingContext,
    RoundingScale,
};

/// One element's resolved placement, with its children's.
///
/// Built fresh for every pass and never retained by the engine. Frames are
/// relative to the parent node's frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResultNode {
    /// The element's identifier among its siblings.
    pub identifier: ElementIdentifier,
    /// The element that was laid out.
    pub element: AnyElement,
    /// Frame and presentation attributes, relative to the parent.
    pub attributes: LayoutAttributes,
    /// Child results, in layout order.
    pub children: Vec<LayoutResultNode>,
}

impl LayoutResultNode {
    /// The node's frame relative to its parent.
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.attributes.frame()
    }

    /// The direct child with the given identifier.
    #[must_use]
    pub fn child(&self, identifier: &ElementIdentifier) -> Option<&Self> {
        self.children
            .iter()
            .find(|child| &child.identifier == identifier)
    }

    /// Every node in depth-first order, with its path from this node and
    /// its frame in this node's parent's coordinate space.
    #[must_use]
    pub fn flatten(&self) -> Vec<(ElementPath, Rect)> {
        let mut nodes = Vec::new();
        self.flatten_into(&ElementPath::new(), Point::zero(), &mut nodes);
        nodes
    }

    fn flatten_into(
        &self,
        parent: &ElementPath,
        origin: Point,
        nodes: &mut Vec<(ElementPath, Rect)>,
    ) {
        let path = parent.appending(self.identifier.clone());
        let frame = self.frame().offset_by(origin);
        nodes.push((path.clone(), frame));
        for child in &self.children {
            child.flatten_into(&path, frame.origin(), nodes);
        }
    }

    /// Snaps every frame to the pixel grid of `scale`.
    ///
    /// Frames are rounded in absolute coordinates, so edges shared by
    /// neighbours before rounding are still shared afterwards.
    #[must_use]
    pub fn round(&self, scale: RoundingScale) -> Self {
        self.rounded(scale, RoundingContext::default())
    }

    fn rounded(&self, scale: RoundingScale, parent: RoundingContext) -> Self {
        let (frame, context) = scale.round_frame(self.frame(), parent);
        Self {
            identifier: self.identifier.clone(),
            element: self.element.clone(),
            attributes: self.attributes.with_frame(frame),
            children: self
                .children
                .iter()
                .map(|child| child.rounded(scale, context))
                .collect(),
        }
    }
}
