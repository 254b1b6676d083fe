use crate::emitter::with_node_context;
use crate::emitter::EmitResult;
use crate::expr::ExprEmitter;
use crate::precedence::ASSIGNMENT_PRECEDENCE;
use parse_js::ast::class_or_object::ClassOrObjKey;
use parse_js::ast::expr::pat::ArrPat;
use parse_js::ast::expr::pat::ObjPat;
use parse_js::ast::expr::pat::ObjPatProp;
use parse_js::ast::expr::pat::Pat;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::decl::ParamDecl;
use parse_js::ast::stmt::decl::PatDecl;

impl<'a> ExprEmitter<'a> {
  pub(crate) fn emit_pat(&mut self, pat: &Node<Pat>) -> EmitResult {
    match pat.stx.as_ref() {
      Pat::Id(id) => {
        self.out.write_identifier(&id.stx.name);
        Ok(())
      }
      Pat::Arr(arr) => self.emit_arr_pat(arr),
      Pat::Obj(obj) => self.emit_obj_pat(obj),
    }
  }

  pub(crate) fn emit_pat_decl(&mut self, decl: &Node<PatDecl>) -> EmitResult {
    self.emit_pat(&decl.stx.pat)
  }

  pub(crate) fn emit_param_decl(&mut self, param: &Node<ParamDecl>) -> EmitResult {
    with_node_context(param.loc, || {
      if param.stx.rest {
        self.out.write_punct("...");
      };
      self.emit_pat_decl(&param.stx.pattern)?;
      self.emit_default_value(param.stx.default_value.as_ref())
    })
  }

  fn emit_default_value(&mut self, default_value: Option<&Node<Expr>>) -> EmitResult {
    if let Some(value) = default_value {
      self.out.write_space();
      self.out.write_punct("=");
      self.out.write_space();
      self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)?;
    };
    Ok(())
  }

  pub(crate) fn emit_arr_pat(&mut self, arr: &Node<ArrPat>) -> EmitResult {
    with_node_context(arr.loc, || {
      let no_in = std::mem::replace(&mut self.no_in, false);
      self.out.write_punct("[");
      for (idx, elem) in arr.stx.elements.iter().enumerate() {
        if idx > 0 {
          self.out.write_punct(",");
          self.out.write_space();
        }
        if let Some(elem) = elem {
          self.emit_pat(&elem.target)?;
          self.emit_default_value(elem.default_value.as_ref())?;
        };
      }
      if let Some(rest) = &arr.stx.rest {
        if !arr.stx.elements.is_empty() {
          self.out.write_punct(",");
          self.out.write_space();
        };
        self.out.write_punct("...");
        self.emit_pat(rest)?;
      } else if matches!(arr.stx.elements.last(), Some(None)) {
        self.out.write_punct(",");
      };
      self.out.write_punct("]");
      self.no_in = no_in;
      Ok(())
    })
  }

  pub(crate) fn emit_obj_pat(&mut self, obj: &Node<ObjPat>) -> EmitResult {
    with_node_context(obj.loc, || {
      let no_in = std::mem::replace(&mut self.no_in, false);
      self.out.write_punct("{");
      for (idx, prop) in obj.stx.properties.iter().enumerate() {
        if idx > 0 {
          self.out.write_punct(",");
          self.out.write_space();
        }
        self.emit_obj_pat_prop(prop)?;
      }
      if let Some(rest) = &obj.stx.rest {
        if !obj.stx.properties.is_empty() {
          self.out.write_punct(",");
          self.out.write_space();
        };
        self.out.write_punct("...");
        self.out.write_identifier(&rest.stx.name);
      };
      self.out.write_punct("}");
      self.no_in = no_in;
      Ok(())
    })
  }

  fn emit_obj_pat_prop(&mut self, prop: &Node<ObjPatProp>) -> EmitResult {
    with_node_context(prop.loc, || {
      let prop = prop.stx.as_ref();
      // A renamed binding can no longer use the shorthand form.
      let shorthand = prop.shorthand
        && match (&prop.key, prop.target.stx.as_ref()) {
          (ClassOrObjKey::Direct(key), Pat::Id(target)) => key.stx.key == target.stx.name,
          _ => false,
        };
      if shorthand {
        self.emit_pat(&prop.target)?;
      } else {
        self.emit_class_or_obj_key(&prop.key)?;
        self.out.write_punct(":");
        self.out.write_space();
        self.emit_pat(&prop.target)?;
      };
      self.emit_default_value(prop.default_value.as_ref())
    })
  }
}
