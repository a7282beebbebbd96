use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AssignmentData, CodecError, ContentTree, Node, NodeId, NodePayload};

/// Persistence-neutral nested form of one node, matching the stored course
/// documents: lowercase `type` discriminant, camelCase fields, folder
/// children nested in place. `parentId` is denormalized for out-of-band
/// readers; on decode the structural nesting is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeRecord {
    #[serde(rename = "folder", rename_all = "camelCase")]
    Folder {
        id: String,
        label: String,
        parent_id: Option<String>,
        children: Vec<NodeRecord>,
    },
    #[serde(rename = "section", rename_all = "camelCase")]
    Section {
        id: String,
        label: String,
        parent_id: Option<String>,
        content: String,
    },
    #[serde(rename = "assignment", rename_all = "camelCase")]
    Assignment {
        id: String,
        label: String,
        parent_id: Option<String>,
        due_date: NaiveDate,
        points: u32,
        description: String,
        instructions: String,
    },
}

impl NodeRecord {
    pub fn id(&self) -> &str {
        match self {
            NodeRecord::Folder { id, .. }
            | NodeRecord::Section { id, .. }
            | NodeRecord::Assignment { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodeRecord::Folder { label, .. }
            | NodeRecord::Section { label, .. }
            | NodeRecord::Assignment { label, .. } => label,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            NodeRecord::Folder { parent_id, .. }
            | NodeRecord::Section { parent_id, .. }
            | NodeRecord::Assignment { parent_id, .. } => parent_id.as_deref(),
        }
    }
}

pub fn encode_forest(records: &[NodeRecord]) -> Result<String, CodecError> {
    serde_json::to_string(records).map_err(CodecError::Encode)
}

pub fn decode_forest(json: &str) -> Result<Vec<NodeRecord>, CodecError> {
    serde_json::from_str(json).map_err(CodecError::Decode)
}

impl ContentTree {
    /// Serializes the forest into its nested plain-data form. Pure function
    /// of tree state.
    pub fn to_records(&self) -> Vec<NodeRecord> {
        self.roots
            .iter()
            .filter_map(|id| self.record_for(id))
            .collect()
    }

    fn record_for(&self, id: &NodeId) -> Option<NodeRecord> {
        let node = self.nodes.get(id)?;
        let id = node.id.to_string();
        let label = node.label.clone();
        let parent_id = node.parent.as_ref().map(NodeId::to_string);
        Some(match &node.payload {
            NodePayload::Folder { children } => NodeRecord::Folder {
                id,
                label,
                parent_id,
                children: children
                    .iter()
                    .filter_map(|child| self.record_for(child))
                    .collect(),
            },
            NodePayload::Section { content } => NodeRecord::Section {
                id,
                label,
                parent_id,
                content: content.clone(),
            },
            NodePayload::Assignment(data) => NodeRecord::Assignment {
                id,
                label,
                parent_id,
                due_date: data.due_date,
                points: data.points,
                description: data.description.clone(),
                instructions: data.instructions.clone(),
            },
        })
    }

    /// Rebuilds a forest from its nested plain-data form. Nesting decides
    /// parentage; an embedded `parentId` that contradicts it, or a duplicate
    /// id, is rejected.
    pub fn from_records(records: Vec<NodeRecord>) -> Result<Self, CodecError> {
        let mut tree = ContentTree::new();
        for record in records {
            let id = insert_record(&mut tree, record, None)?;
            tree.roots.push(id);
        }
        Ok(tree)
    }
}

fn insert_record(
    tree: &mut ContentTree,
    record: NodeRecord,
    parent: Option<&NodeId>,
) -> Result<NodeId, CodecError> {
    let id = NodeId::from(record.id());

    if let Some(declared) = record.parent_id() {
        if parent.map(NodeId::as_str) != Some(declared) {
            return Err(CodecError::ParentMismatch(id));
        }
    }
    if tree.nodes.contains_key(&id) {
        return Err(CodecError::DuplicateId(id));
    }

    match record {
        NodeRecord::Folder {
            label, children, ..
        } => {
            tree.nodes.insert(
                id.clone(),
                Node {
                    id: id.clone(),
                    label,
                    parent: parent.cloned(),
                    payload: NodePayload::Folder {
                        children: Vec::new(),
                    },
                },
            );
            let mut child_ids = Vec::with_capacity(children.len());
            for child in children {
                child_ids.push(insert_record(tree, child, Some(&id))?);
            }
            if let Some(Node {
                payload: NodePayload::Folder { children },
                ..
            }) = tree.nodes.get_mut(&id)
            {
                *children = child_ids;
            }
        }
        NodeRecord::Section { label, content, .. } => {
            tree.nodes.insert(
                id.clone(),
                Node {
                    id: id.clone(),
                    label,
                    parent: parent.cloned(),
                    payload: NodePayload::Section { content },
                },
            );
        }
        NodeRecord::Assignment {
            label,
            due_date,
            points,
            description,
            instructions,
            ..
        } => {
            tree.nodes.insert(
                id.clone(),
                Node {
                    id: id.clone(),
                    label,
                    parent: parent.cloned(),
                    payload: NodePayload::Assignment(AssignmentData {
                        due_date,
                        points,
                        description,
                        instructions,
                    }),
                },
            );
        }
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate};

    use super::*;
    use crate::{AssignmentField, NodeKind};

    #[test]
    fn round_trip_preserves_tree() {
        let mut tree = ContentTree::new();
        let unit = tree.add_node(None, NodeKind::Folder, "Unit 1").unwrap();
        let notes = tree.add_node(Some(&unit), NodeKind::Section, "Notes").unwrap();
        let hw = tree.add_node(Some(&unit), NodeKind::Assignment, "HW1").unwrap();
        tree.add_node(None, NodeKind::Section, "Syllabus").unwrap();
        tree.update_section_content(&notes, "Lecture notes").unwrap();
        tree.update_assignment_field(&hw, AssignmentField::Points(25))
            .unwrap();

        let records = tree.to_records();
        let rebuilt = ContentTree::from_records(records.clone()).unwrap();

        assert_eq!(rebuilt, tree);
        assert_eq!(rebuilt.to_records(), records);
    }

    #[test]
    fn scenario_folder_with_assignment() {
        let mut tree = ContentTree::new();
        let f1 = tree.add_node(None, NodeKind::Folder, "Unit 1").unwrap();
        let a1 = tree.add_node(Some(&f1), NodeKind::Assignment, "HW1").unwrap();
        tree.update_assignment_field(&a1, AssignmentField::Points(10))
            .unwrap();

        let records = tree.to_records();
        assert_eq!(records.len(), 1);
        let NodeRecord::Folder { label, children, parent_id, .. } = &records[0] else {
            panic!("expected a folder root");
        };
        assert_eq!(label, "Unit 1");
        assert_eq!(*parent_id, None);
        assert_eq!(children.len(), 1);

        let NodeRecord::Assignment {
            label,
            parent_id,
            due_date,
            points,
            description,
            instructions,
            ..
        } = &children[0]
        else {
            panic!("expected an assignment child");
        };
        assert_eq!(label, "HW1");
        assert_eq!(parent_id.as_deref(), Some(f1.as_str()));
        assert_eq!(*due_date, Local::now().date_naive());
        assert_eq!(*points, 10);
        assert_eq!(description, "");
        assert_eq!(instructions, "");
    }

    #[test]
    fn decodes_stored_json() {
        let json = r#"[
            {
                "type": "folder",
                "id": "f1",
                "label": "Unit 1",
                "parentId": null,
                "children": [
                    {
                        "type": "assignment",
                        "id": "a1",
                        "label": "HW1",
                        "parentId": "f1",
                        "dueDate": "2025-02-08",
                        "points": 10,
                        "description": "",
                        "instructions": ""
                    }
                ]
            }
        ]"#;

        let records = decode_forest(json).unwrap();
        let tree = ContentTree::from_records(records).unwrap();

        let a1 = NodeId::from("a1");
        let node = tree.find_node(&a1).unwrap();
        assert_eq!(node.label, "HW1");
        assert_eq!(node.parent, Some(NodeId::from("f1")));
        let NodePayload::Assignment(data) = &node.payload else {
            panic!("expected assignment");
        };
        assert_eq!(data.due_date, NaiveDate::from_ymd_opt(2025, 2, 8).unwrap());
        assert_eq!(data.points, 10);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let json = r#"[{"type": "quiz", "id": "q1", "label": "Quiz 1", "parentId": null}]"#;
        let err = decode_forest(json).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn missing_variant_field_is_rejected() {
        let json = r#"[{"type": "section", "id": "s1", "label": "Notes", "parentId": null}]"#;
        let err = decode_forest(json).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn negative_points_in_stored_json_rejected() {
        let json = r#"[{
            "type": "assignment",
            "id": "a1",
            "label": "HW1",
            "parentId": null,
            "dueDate": "2025-02-08",
            "points": -5,
            "description": "",
            "instructions": ""
        }]"#;
        let err = decode_forest(json).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn parent_id_contradicting_nesting_rejected() {
        let records = vec![NodeRecord::Folder {
            id: "f1".into(),
            label: "Unit 1".into(),
            parent_id: None,
            children: vec![NodeRecord::Section {
                id: "s1".into(),
                label: "Notes".into(),
                parent_id: Some("somewhere-else".into()),
                content: String::new(),
            }],
        }];

        let err = ContentTree::from_records(records).unwrap_err();
        assert!(matches!(err, CodecError::ParentMismatch(id) if id.as_str() == "s1"));
    }

    #[test]
    fn absent_parent_id_is_recomputed_from_nesting() {
        let records = vec![NodeRecord::Folder {
            id: "f1".into(),
            label: "Unit 1".into(),
            parent_id: None,
            children: vec![NodeRecord::Section {
                id: "s1".into(),
                label: "Notes".into(),
                parent_id: None,
                content: String::new(),
            }],
        }];

        let tree = ContentTree::from_records(records).unwrap();
        let node = tree.find_node(&NodeId::from("s1")).unwrap();
        assert_eq!(node.parent, Some(NodeId::from("f1")));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let records = vec![
            NodeRecord::Section {
                id: "s1".into(),
                label: "One".into(),
                parent_id: None,
                content: String::new(),
            },
            NodeRecord::Section {
                id: "s1".into(),
                label: "Two".into(),
                parent_id: None,
                content: String::new(),
            },
        ];

        let err = ContentTree::from_records(records).unwrap_err();
        assert!(matches!(err, CodecError::DuplicateId(id) if id.as_str() == "s1"));
    }

    #[test]
    fn empty_forest_round_trips() {
        let tree = ContentTree::new();
        let json = encode_forest(&tree.to_records()).unwrap();
        assert_eq!(json, "[]");
        let rebuilt = ContentTree::from_records(decode_forest(&json).unwrap()).unwrap();
        assert!(rebuilt.is_empty());
    }
}
