mod lattice;
