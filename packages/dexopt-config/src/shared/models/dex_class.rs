//! Class and member models

use super::{AccessFlags, DexType};

/// Field or method of a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexMember {
    pub name: String,
    /// Field type descriptor (`I`) or method prototype (`(ILjava/lang/String;)V`)
    pub descriptor: String,
    pub access: AccessFlags,
    pub annotations: Vec<DexType>,
}

impl DexMember {
    pub fn new(
        name: impl Into<String>,
        descriptor: impl Into<String>,
        access: AccessFlags,
    ) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            access,
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, anno: DexType) -> Self {
        self.annotations.push(anno);
        self
    }
}

/// Class definition as seen by the configuration layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexClass {
    pub ty: DexType,
    pub access: AccessFlags,
    pub super_class: Option<DexType>,
    pub interfaces: Vec<DexType>,
    pub annotations: Vec<DexType>,
    pub fields: Vec<DexMember>,
    pub methods: Vec<DexMember>,
}

impl DexClass {
    pub fn new(ty: DexType, access: AccessFlags) -> Self {
        Self {
            ty,
            access,
            super_class: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_super(mut self, super_class: DexType) -> Self {
        self.super_class = Some(super_class);
        self
    }

    pub fn with_interface(mut self, iface: DexType) -> Self {
        self.interfaces.push(iface);
        self
    }

    pub fn with_annotation(mut self, anno: DexType) -> Self {
        self.annotations.push(anno);
        self
    }

    pub fn with_field(mut self, field: DexMember) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: DexMember) -> Self {
        self.methods.push(method);
        self
    }

    /// Internal descriptor of the class
    pub fn name(&self) -> &str {
        self.ty.descriptor()
    }

    /// Java spelling of the class name
    pub fn java_name(&self) -> String {
        self.ty.java_name()
    }

    /// Types this class directly extends or implements
    pub fn supertypes(&self) -> impl Iterator<Item = &DexType> {
        self.super_class.iter().chain(self.interfaces.iter())
    }
}
