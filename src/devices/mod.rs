
// Raw-socket SCPI devices, organised by manufacturer

pub mod rigol;
